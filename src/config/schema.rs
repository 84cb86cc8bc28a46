//! Configuration schema types for `respimg.toml`
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock pipeline: `src/assets/images` in, WebP variants at 800/1200/1600px
//! out to `src/assets/images/optimized`.

use crate::build::manifest::MANIFEST_FILENAME;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project layout section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Directory scanned for source images
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Directory receiving variants and the manifest
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Root that manifest `src` paths are relative to
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { src: default_src(), out: default_out(), asset_root: default_asset_root() }
    }
}

fn default_src() -> PathBuf {
    PathBuf::from("src/assets/images")
}

fn default_out() -> PathBuf {
    PathBuf::from("src/assets/images/optimized")
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("src")
}

/// Variant generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Target widths, processed in this order
    #[serde(default = "default_widths")]
    pub widths: Vec<u32>,
    /// Lossy WebP quality (1-100)
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Accepted source extensions, matched case-sensitively
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Manifest file name inside the output directory
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            widths: default_widths(),
            quality: default_quality(),
            extensions: default_extensions(),
            manifest: default_manifest(),
        }
    }
}

fn default_widths() -> Vec<u32> {
    vec![800, 1200, 1600]
}

fn default_quality() -> u8 {
    75
}

fn default_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"].iter().map(|s| s.to_string()).collect()
}

fn default_manifest() -> String {
    MANIFEST_FILENAME.to_string()
}

/// Execution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Worker threads; 1 processes one (image, width) pair at a time
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { jobs: default_jobs() }
    }
}

fn default_jobs() -> usize {
    1
}

/// Complete respimg.toml configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RespimgConfig {
    /// Directory layout
    #[serde(default)]
    pub project: ProjectConfig,
    /// Variant settings
    #[serde(default)]
    pub images: ImagesConfig,
    /// Execution settings
    #[serde(default)]
    pub build: BuildConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "images.quality")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "respimg.toml: '{}' {}", self.field, self.message)
    }
}

impl RespimgConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.images.widths.is_empty() {
            errors.push(ConfigValidationError {
                field: "images.widths".to_string(),
                message: "must contain at least one width".to_string(),
            });
        }
        if self.images.widths.iter().any(|&w| w == 0) {
            errors.push(ConfigValidationError {
                field: "images.widths".to_string(),
                message: "widths must be positive".to_string(),
            });
        }

        if self.images.quality == 0 || self.images.quality > 100 {
            errors.push(ConfigValidationError {
                field: "images.quality".to_string(),
                message: "must be between 1 and 100".to_string(),
            });
        }

        if self.images.extensions.is_empty() {
            errors.push(ConfigValidationError {
                field: "images.extensions".to_string(),
                message: "must contain at least one extension".to_string(),
            });
        }
        if self.images.extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
            errors.push(ConfigValidationError {
                field: "images.extensions".to_string(),
                message: "extensions are written without a leading dot".to_string(),
            });
        }

        if self.images.manifest.is_empty() {
            errors.push(ConfigValidationError {
                field: "images.manifest".to_string(),
                message: "must be a non-empty file name".to_string(),
            });
        }

        if self.build.jobs == 0 {
            errors.push(ConfigValidationError {
                field: "build.jobs".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
