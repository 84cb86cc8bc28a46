//! Configuration loading and discovery for `respimg.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::RespimgConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file name searched for by [`find_config`].
pub const CONFIG_FILENAME: &str = "respimg.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse respimg.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override source directory
    pub src: Option<PathBuf>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override target widths
    pub widths: Option<Vec<u32>>,
    /// Override WebP quality
    pub quality: Option<u8>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Find respimg.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a respimg.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find respimg.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a respimg.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<RespimgConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<RespimgConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: RespimgConfig = toml::from_str(&contents)?;
    check(config)
}

/// Reject a configuration that fails validation.
pub fn check(config: RespimgConfig) -> Result<RespimgConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// The configuration used when no respimg.toml exists.
pub fn default_config() -> RespimgConfig {
    RespimgConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut RespimgConfig, overrides: &CliOverrides) {
    if let Some(ref src) = overrides.src {
        config.project.src = src.clone();
    }

    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }

    if let Some(ref widths) = overrides.widths {
        config.images.widths = widths.clone();
    }

    if let Some(quality) = overrides.quality {
        config.images.quality = quality;
    }

    if let Some(jobs) = overrides.jobs {
        config.build.jobs = jobs;
    }
}

/// Get the project root directory from a config file path.
///
/// Returns the parent directory of the respimg.toml file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILENAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[images]\nquality = 80");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let subdir = temp.path().join("src").join("assets");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            r#"
[project]
src = "images"

[images]
widths = [640, 1280]
quality = 60
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.project.src, PathBuf::from("images"));
        assert_eq!(config.project.out, PathBuf::from("src/assets/images/optimized"));
        assert_eq!(config.images.widths, vec![640, 1280]);
        assert_eq!(config.images.quality, 60);
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("nonexistent.toml");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[images]\nwidths = []\nquality = 0");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides_paths() {
        let mut config = default_config();
        let overrides = CliOverrides {
            src: Some(PathBuf::from("photos")),
            out: Some(PathBuf::from("dist/img")),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.project.src, PathBuf::from("photos"));
        assert_eq!(config.project.out, PathBuf::from("dist/img"));
    }

    #[test]
    fn test_merge_cli_overrides_images() {
        let mut config = default_config();
        let overrides = CliOverrides {
            widths: Some(vec![320]),
            quality: Some(90),
            jobs: Some(3),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.images.widths, vec![320]);
        assert_eq!(config.images.quality, 90);
        assert_eq!(config.build.jobs, 3);
    }

    #[test]
    fn test_merge_no_overrides_keeps_config() {
        let mut config = default_config();
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert_eq!(config, default_config());
    }

    #[test]
    fn test_check_rejects_invalid() {
        let mut config = default_config();
        config.build.jobs = 0;
        assert!(matches!(check(config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_resolve_path_absolute() {
        let root = Path::new("/project");
        let absolute = Path::new("/other/path");
        assert_eq!(resolve_path(root, absolute), PathBuf::from("/other/path"));
    }

    #[test]
    fn test_resolve_path_relative() {
        let root = Path::new("/project");
        let relative = Path::new("src/assets/images");
        assert_eq!(resolve_path(root, relative), PathBuf::from("/project/src/assets/images"));
    }

    #[test]
    fn test_project_root() {
        let config_path = Path::new("/project/respimg.toml");
        assert_eq!(project_root(config_path), Some(Path::new("/project")));
    }
}
