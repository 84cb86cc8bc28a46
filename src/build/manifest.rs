//! Image manifest describing every generated variant.
//!
//! The manifest is the contract between the build pipeline and the asset
//! resolver. It is written as pretty-printed JSON into the output directory:
//!
//! ```json
//! {
//!   "stage": {
//!     "sizes": {
//!       "800": {
//!         "width": 800,
//!         "height": 533,
//!         "src": "assets/images/optimized/stage-800.webp",
//!         "bytes": 48213
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Width keys are serialized as strings. `src` is relative to the asset root
//! and always uses `/` separators. Each run regenerates the file from
//! scratch; nothing is merged from a previous manifest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Component, Path};

/// Default manifest filename.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Error during manifest operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ManifestError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One resized rendition of a source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Path relative to the asset root, `/`-separated
    pub src: String,
    /// Size of the written file
    pub bytes: u64,
}

/// All variants of one source image, keyed by effective width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Variants by effective width
    pub sizes: BTreeMap<u32, Variant>,
}

impl ManifestEntry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a variant, replacing any previous one at the same width.
    ///
    /// Returns `true` if a variant was already present for that width.
    pub fn record(&mut self, variant: Variant) -> bool {
        self.sizes.insert(variant.width, variant).is_some()
    }

    /// Variant at exactly `width`.
    pub fn get(&self, width: u32) -> Option<&Variant> {
        self.sizes.get(&width)
    }

    /// Produced widths in ascending order.
    pub fn widths(&self) -> Vec<u32> {
        self.sizes.keys().copied().collect()
    }
}

/// Manifest of all processed images keyed by base name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Create a new empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `base`.
    pub fn insert(&mut self, base: impl Into<String>, entry: ManifestEntry) {
        self.entries.insert(base.into(), entry);
    }

    /// Entry for a base name.
    pub fn entry(&self, base: &str) -> Option<&ManifestEntry> {
        self.entries.get(base)
    }

    /// Variant for a base name at a width.
    pub fn variant(&self, base: &str, width: u32) -> Option<&Variant> {
        self.entry(base).and_then(|e| e.get(width))
    }

    /// Produced widths for a base name (empty if unknown).
    pub fn widths(&self, base: &str) -> Vec<u32> {
        self.entry(base).map(ManifestEntry::widths).unwrap_or_default()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ManifestEntry)> {
        self.entries.iter()
    }

    /// Iterate every variant as `(base, variant)`.
    pub fn variants(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.entries
            .iter()
            .flat_map(|(base, entry)| entry.sizes.values().map(move |v| (base.as_str(), v)))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total bytes across all variants.
    pub fn total_bytes(&self) -> u64 {
        self.variants().map(|(_, v)| v.bytes).sum()
    }

    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the manifest to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        Ok(())
    }
}

/// Express `path` relative to `root` with forward slashes.
///
/// Both paths are expected to be absolute (or both relative to the same
/// base). When `path` lies outside `root` the result climbs with `..`.
pub fn relative_src(root: &Path, path: &Path) -> String {
    let root: Vec<Component> = root.components().collect();
    let path: Vec<Component> = path.components().collect();
    let common = root.iter().zip(&path).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = Vec::new();
    for c in &root[common..] {
        if matches!(c, Component::Normal(_)) {
            parts.push("..".to_string());
        }
    }
    for c in &path[common..] {
        match c {
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
            Component::ParentDir => parts.push("..".to_string()),
            _ => {}
        }
    }
    normalize_separators(&parts.join("/"))
}

/// Replace backslashes with forward slashes.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn variant(width: u32, height: u32, name: &str) -> Variant {
        Variant {
            width,
            height,
            src: format!("assets/images/optimized/{}-{}.webp", name, width),
            bytes: u64::from(width) * 10,
        }
    }

    fn sample() -> Manifest {
        let mut stage = ManifestEntry::new();
        stage.record(variant(800, 533, "stage"));
        stage.record(variant(1200, 800, "stage"));
        let mut rooms = ManifestEntry::new();
        rooms.record(variant(600, 400, "rooms"));

        let mut manifest = Manifest::new();
        manifest.insert("stage", stage);
        manifest.insert("rooms", rooms);
        manifest
    }

    #[test]
    fn test_manifest_json_shape() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let v = &value["stage"]["sizes"]["800"];
        assert_eq!(v["width"], 800);
        assert_eq!(v["height"], 533);
        assert_eq!(v["src"], "assets/images/optimized/stage-800.webp");
        assert_eq!(v["bytes"], 8000);
        assert!(value["rooms"]["sizes"]["600"].is_object());
        // two-space indentation
        assert!(json.contains("\n  \"rooms\": {"));
    }

    #[test]
    fn test_manifest_parse_external_json() {
        let json = r#"{
          "entrance": { "sizes": {
            "1200": { "width": 1200, "height": 675, "src": "assets/images/optimized/entrance-1200.webp", "bytes": 91000 }
          } }
        }"#;
        let manifest = Manifest::from_json(json).unwrap();
        let v = manifest.variant("entrance", 1200).unwrap();
        assert_eq!(v.height, 675);
        assert_eq!(manifest.widths("entrance"), vec![1200]);
        assert!(manifest.variant("entrance", 800).is_none());
        assert!(manifest.entry("missing").is_none());
    }

    #[test]
    fn test_manifest_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/out/manifest.json");

        let manifest = sample();
        manifest.save(&path).unwrap();
        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_manifest_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = Manifest::load(&temp.path().join("manifest.json"));
        assert!(matches!(result, Err(ManifestError::Io(_))));
    }

    #[test]
    fn test_entry_record_overwrites_same_width() {
        let mut entry = ManifestEntry::new();
        assert!(!entry.record(variant(600, 400, "rooms")));
        assert!(entry.record(variant(600, 400, "rooms")));
        assert_eq!(entry.sizes.len(), 1);
    }

    #[test]
    fn test_manifest_totals() {
        let manifest = sample();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.variants().count(), 3);
        assert_eq!(manifest.total_bytes(), 8000 + 12000 + 6000);
    }

    #[test]
    fn test_relative_src() {
        let root = Path::new("/site/src");
        assert_eq!(
            relative_src(root, Path::new("/site/src/assets/images/optimized/stage-800.webp")),
            "assets/images/optimized/stage-800.webp"
        );
        assert_eq!(
            relative_src(Path::new("/site/public"), Path::new("/site/build/img/a-800.webp")),
            "../build/img/a-800.webp"
        );
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(
            normalize_separators(r"assets\images\optimized\a-800.webp"),
            "assets/images/optimized/a-800.webp"
        );
    }
}
