//! Source image discovery.
//!
//! Lists the top level of the source directory and keeps regular files whose
//! extension is one of the configured ones. Matching is case-sensitive, so
//! `photo.JPG` qualifies under the default set but `photo.Jpg` does not.

use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Error during source discovery.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Source directory missing or not a directory
    #[error("source directory not found: {0}")]
    MissingDir(PathBuf),
    /// Invalid glob pattern
    #[error("invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, glob::PatternError),
    /// IO error during file enumeration
    #[error("IO error during discovery: {0}")]
    Io(#[from] std::io::Error),
}

/// Discover qualifying source images directly inside `src_dir`.
///
/// Subdirectories (including an output directory nested in the source
/// directory) are never descended into. The result is sorted by path.
pub fn discover_images(
    src_dir: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !src_dir.is_dir() {
        return Err(DiscoveryError::MissingDir(src_dir.to_path_buf()));
    }

    let escaped = Pattern::escape(&src_dir.to_string_lossy());
    let pattern = format!("{}/*", escaped);
    let paths = glob(&pattern).map_err(|e| DiscoveryError::InvalidPattern(pattern.clone(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| DiscoveryError::Io(e.into_error()))?;
        if path.is_file() && has_accepted_extension(&path, extensions) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Check a path's extension against the accepted set (exact match).
pub fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.iter().any(|accepted| accepted == ext),
        None => false,
    }
}

/// Base name used for output files and the manifest key.
pub fn base_name(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        default_config().images.extensions
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(&path).unwrap().write_all(b"x").unwrap();
        path
    }

    #[test]
    fn test_discover_images_filters_extensions() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "stage.jpg");
        touch(temp.path(), "rooms.png");
        touch(temp.path(), "notes.txt");
        touch(temp.path(), "hall.webp");

        let files = discover_images(temp.path(), &exts()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("rooms.png"));
        assert!(files[1].ends_with("stage.jpg"));
    }

    #[test]
    fn test_discover_images_case_sensitive() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.JPG");
        touch(temp.path(), "b.JPEG");
        touch(temp.path(), "c.PNG");
        touch(temp.path(), "d.Jpg");
        touch(temp.path(), "e.pNg");

        let files = discover_images(temp.path(), &exts()).unwrap();
        let names: Vec<_> =
            files.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["a.JPG", "b.JPEG", "c.PNG"]);
    }

    #[test]
    fn test_discover_images_skips_subdirectories() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "entrance.jpeg");
        touch(temp.path(), "optimized/old.png");
        fs::create_dir_all(temp.path().join("folder.jpg")).unwrap();

        let files = discover_images(temp.path(), &exts()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("entrance.jpeg"));
    }

    #[test]
    fn test_discover_images_empty_dir() {
        let temp = TempDir::new().unwrap();
        let files = discover_images(temp.path(), &exts()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_images_missing_dir() {
        let temp = TempDir::new().unwrap();
        let result = discover_images(&temp.path().join("nope"), &exts());
        assert!(matches!(result, Err(DiscoveryError::MissingDir(_))));
    }

    #[test]
    fn test_discover_images_special_chars_in_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("shots [2024]");
        touch(&dir, "stage.jpg");

        let files = discover_images(&dir, &exts()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_has_accepted_extension() {
        let exts = exts();
        assert!(has_accepted_extension(Path::new("a.jpg"), &exts));
        assert!(has_accepted_extension(Path::new("a.PNG"), &exts));
        assert!(!has_accepted_extension(Path::new("a.gif"), &exts));
        assert!(!has_accepted_extension(Path::new("jpg"), &exts));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/x/stage.jpg")), "stage");
        assert_eq!(base_name(Path::new("hall.view.JPEG")), "hall.view");
    }
}
