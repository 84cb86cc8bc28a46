//! Mapping manifest paths to served URLs.
//!
//! Manifest `src` values are relative to the asset root
//! (`assets/images/optimized/stage-800.webp`) while bundler keys usually
//! carry a different prefix (`/src/assets/images/optimized/stage-800.webp`).
//! Lookup therefore falls back to a suffix match: the first key, in table
//! order, that ends with the normalized path wins. An exact key is preferred
//! when one exists. A miss is `None`, never an error.

use crate::build::Manifest;
use crate::resolve::picture::{PictureOptions, ResponsiveImage};
use crate::resolve::AssetTable;
use std::sync::OnceLock;

static GLOBAL: OnceLock<AssetResolver> = OnceLock::new();

/// Strip a single leading `/`.
pub fn normalize(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Whether `key` ends with `normalized`; this also covers keys ending in
/// `/` + `normalized`.
fn matches_suffix(key: &str, normalized: &str) -> bool {
    key.ends_with(normalized)
}

/// Resolve a manifest path against a lookup table.
///
/// Returns `None` for a missing or empty path and when no key matches.
pub fn resolve<'t>(table: &'t AssetTable, path: Option<&str>) -> Option<&'t str> {
    let normalized = normalize(path?);
    if normalized.is_empty() {
        return None;
    }

    if let Some(url) = table.get(normalized).or_else(|| table.get(&format!("/{}", normalized))) {
        return Some(url);
    }

    table.iter().find(|(key, _)| matches_suffix(key, normalized)).map(|(_, url)| url)
}

/// A lookup table paired with the manifest it serves.
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    table: AssetTable,
    manifest: Manifest,
}

impl AssetResolver {
    /// Create a resolver.
    pub fn new(table: AssetTable, manifest: Manifest) -> Self {
        Self { table, manifest }
    }

    /// The lookup table.
    pub fn table(&self) -> &AssetTable {
        &self.table
    }

    /// The manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Resolve a manifest-relative path.
    pub fn resolve(&self, path: Option<&str>) -> Option<&str> {
        resolve(&self.table, path)
    }

    /// Served URL of `key` at exactly `width`.
    pub fn url_for(&self, key: &str, width: u32) -> Option<&str> {
        self.resolve(self.manifest.variant(key, width).map(|v| v.src.as_str()))
    }

    /// Responsive image description for `key` with default options.
    pub fn picture(&self, key: &str) -> ResponsiveImage {
        self.picture_with(key, &PictureOptions::default())
    }

    /// Responsive image description for `key`.
    pub fn picture_with(&self, key: &str, options: &PictureOptions) -> ResponsiveImage {
        ResponsiveImage::pick(self, key, options)
    }
}

/// Returned by [`install`] when a resolver is already in place.
#[derive(Debug, thiserror::Error)]
#[error("asset resolver already installed")]
pub struct AlreadyInstalled(pub AssetResolver);

/// Install the process-wide resolver. Only the first call succeeds.
pub fn install(resolver: AssetResolver) -> Result<&'static AssetResolver, AlreadyInstalled> {
    let mut fresh = Some(resolver);
    let installed = GLOBAL.get_or_init(|| fresh.take().unwrap_or_default());
    match fresh {
        None => Ok(installed),
        Some(rejected) => Err(AlreadyInstalled(rejected)),
    }
}

/// The process-wide resolver, if one was installed.
pub fn global() -> Option<&'static AssetResolver> {
    GLOBAL.get()
}

/// The process-wide resolver, installing the one built by `init` if none
/// exists yet.
pub fn global_or_init(init: impl FnOnce() -> AssetResolver) -> &'static AssetResolver {
    GLOBAL.get_or_init(init)
}
