//! Build context containing configuration and resolved paths for a run.

use crate::config::{default_config, RespimgConfig};
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for one pipeline run.
///
/// All directories in the configuration are relative to `project_root`
/// unless they are absolute.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: RespimgConfig,
    /// Project root directory (where respimg.toml is located, or the cwd)
    project_root: PathBuf,
    /// Whether to run in verbose mode
    verbose: bool,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: RespimgConfig, project_root: PathBuf) -> Self {
        Self { config, project_root, verbose: false }
    }

    /// Context with default configuration rooted at `project_root`.
    pub fn with_defaults(project_root: PathBuf) -> Self {
        Self::new(default_config(), project_root)
    }

    /// Get the configuration.
    pub fn config(&self) -> &RespimgConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Source image directory.
    pub fn src_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.src)
    }

    /// Output directory for variants and the manifest.
    pub fn out_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.out)
    }

    /// Root that manifest `src` values are relative to.
    pub fn asset_root(&self) -> PathBuf {
        self.resolve_path(&self.config.project.asset_root)
    }

    /// Full path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir().join(&self.config.images.manifest)
    }

    /// Configured target widths in processing order.
    pub fn widths(&self) -> &[u32] {
        &self.config.images.widths
    }

    /// WebP quality.
    pub fn quality(&self) -> u8 {
        self.config.images.quality
    }

    /// Accepted source extensions.
    pub fn extensions(&self) -> &[String] {
        &self.config.images.extensions
    }

    /// Worker count.
    pub fn jobs(&self) -> usize {
        self.config.build.jobs.max(1)
    }

    /// Whether verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Resolve a path relative to the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        crate::config::loader::resolve_path(&self.project_root, path)
    }

    /// Display form of `path` relative to the project root, for log lines.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.project_root).unwrap_or(path).display().to_string()
    }
}
