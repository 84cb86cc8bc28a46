//! Bundler lookup table: original asset path -> served URL.
//!
//! The packaging step renames, hashes or relocates files; it publishes a
//! table keyed by each file's original path (for example
//! `/src/assets/images/optimized/stage-800.webp`) whose values are the URLs
//! the page should use. Enumeration order is the order entries were added,
//! which for JSON input is document order.

use crate::build::manifest::relative_src;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Error while loading or building a lookup table.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TableError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered mapping from original asset path to served URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl AssetTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(original path, served URL)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (k, v) in pairs {
            table.insert(k, v);
        }
        table
    }

    /// Add an entry. Re-inserting a key replaces its URL in place.
    pub fn insert(&mut self, key: impl Into<String>, url: impl Into<String>) {
        let key = key.into();
        let url = url.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = url,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, url));
            }
        }
    }

    /// URL stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    /// Entries in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object of `"original": "url"` pairs.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON table file.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Table for the files currently in `out_dir`, keyed the way the
    /// bundler keys them (`/` + path relative to `project_root`) and served
    /// flat under `base_url`.
    pub fn scan(project_root: &Path, out_dir: &Path, base_url: &str) -> Result<Self, TableError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(out_dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let base = if base_url.ends_with('/') || base_url.is_empty() {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        let mut table = Self::new();
        for path in files {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            let key = format!("/{}", relative_src(project_root, &path));
            table.insert(key, format!("{}{}", base, name));
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for AssetTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = AssetTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping asset paths to URLs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<AssetTable, A::Error> {
                let mut table = AssetTable::new();
                while let Some((k, v)) = map.next_entry::<String, String>()? {
                    table.insert(k, v);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
