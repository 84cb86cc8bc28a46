//! Outcome of a pipeline run.

use crate::build::Manifest;
use std::path::PathBuf;
use std::time::Duration;

/// Result of a complete, successful pipeline run.
///
/// Failed runs do not produce a summary; they surface a
/// [`PipelineError`](crate::build::PipelineError) instead.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Source images processed
    pub images: usize,
    /// Variant files written (including rewrites of collapsed widths)
    pub variants_written: usize,
    /// Bytes across the variants recorded in the manifest
    pub total_bytes: u64,
    /// Manifest location, `None` when there was nothing to do
    pub manifest_path: Option<PathBuf>,
    /// The manifest that was written
    pub manifest: Manifest,
    /// Non-fatal notes (collapsed widths, duplicate base names)
    pub warnings: Vec<String>,
    /// Total run duration
    pub duration: Duration,
}

impl RunSummary {
    /// Summary for a run that found no qualifying sources.
    pub fn nothing_to_do(duration: Duration) -> Self {
        Self { duration, ..Self::default() }
    }

    /// Whether the run had no images to process.
    pub fn is_empty(&self) -> bool {
        self.images == 0
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Format a one-line summary of the run.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "Nothing to do: no source images".to_string();
        }
        let mut line = format!(
            "Processed {} image{} into {} variant file{} ({} bytes) in {:?}",
            self.images,
            if self.images == 1 { "" } else { "s" },
            self.variants_written,
            if self.variants_written == 1 { "" } else { "s" },
            self.total_bytes,
            self.duration
        );
        if !self.warnings.is_empty() {
            line.push_str(&format!(", {} warning(s)", self.warnings.len()));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_do() {
        let summary = RunSummary::nothing_to_do(Duration::from_millis(3));
        assert!(summary.is_empty());
        assert!(summary.manifest_path.is_none());
        assert!(summary.manifest.is_empty());
        assert_eq!(summary.summary(), "Nothing to do: no source images");
    }

    #[test]
    fn test_summary_line() {
        let summary = RunSummary {
            images: 2,
            variants_written: 6,
            total_bytes: 1234,
            manifest_path: Some(PathBuf::from("out/manifest.json")),
            warnings: vec!["rooms: width 1600 collapses to 600".to_string()],
            ..Default::default()
        }
        .with_duration(Duration::from_millis(10));

        let line = summary.summary();
        assert!(line.starts_with("Processed 2 images into 6 variant files (1234 bytes)"));
        assert!(line.ends_with(", 1 warning(s)"));
    }
}
