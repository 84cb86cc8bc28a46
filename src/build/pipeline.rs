//! Pipeline orchestration.
//!
//! One run discovers source images, writes every configured variant, and
//! finally writes the manifest. The first error aborts the run; the manifest
//! is only written when every variant succeeded.

use crate::build::discovery::{base_name, discover_images, DiscoveryError};
use crate::build::manifest::{relative_src, Manifest, ManifestEntry, ManifestError, Variant};
use crate::build::progress::{ConsoleProgress, ProgressEvent, ProgressReporter};
use crate::build::variant::{variant_file_name, SourceImage, VariantError};
use crate::build::{BuildContext, RunSummary};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Error that aborts a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Source enumeration failed
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// A source could not be decoded or a variant not encoded
    #[error(transparent)]
    Variant(#[from] VariantError),
    /// Output directory or variant file could not be written
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Manifest could not be written
    #[error("cannot write manifest: {0}")]
    Manifest(#[from] ManifestError),
    /// Worker pool could not be created
    #[error("cannot start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Everything produced for one source image.
#[derive(Debug)]
struct ProcessedImage {
    base: String,
    entry: ManifestEntry,
    written: usize,
    warnings: Vec<String>,
}

/// Image pipeline executing one run per [`ImagePipeline::run`] call.
pub struct ImagePipeline {
    /// Build context
    context: BuildContext,
    /// Where progress lines go
    reporter: Arc<dyn ProgressReporter>,
}

impl ImagePipeline {
    /// Create a pipeline that reports to the console.
    pub fn new(context: BuildContext) -> Self {
        let reporter = Arc::new(ConsoleProgress::new().with_verbose(context.is_verbose()));
        Self { context, reporter }
    }

    /// Replace the progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Build context of this pipeline.
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Run the pipeline.
    ///
    /// Returns a summary with `images == 0` (and writes nothing) when the
    /// source directory has no qualifying files.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let start = Instant::now();
        let ctx = &self.context;

        let src_dir = ctx.src_dir();
        let sources = discover_images(&src_dir, ctx.extensions())?;
        if sources.is_empty() {
            self.reporter.report(ProgressEvent::NoSources { dir: src_dir.display().to_string() });
            return Ok(RunSummary::nothing_to_do(start.elapsed()));
        }

        let out_dir = ctx.out_dir();
        fs::create_dir_all(&out_dir)
            .map_err(|source| PipelineError::Write { path: out_dir.clone(), source })?;

        self.reporter.report(ProgressEvent::RunStarted {
            images: sources.len(),
            widths: ctx.widths().len(),
            jobs: ctx.jobs(),
        });

        let processed = if ctx.jobs() > 1 {
            self.process_parallel(&sources)?
        } else {
            sources.iter().map(|p| self.process_image(p)).collect::<Result<Vec<_>, _>>()?
        };

        let mut summary = RunSummary::default();
        let mut manifest = Manifest::new();
        for image in processed {
            if manifest.entry(&image.base).is_some() {
                let message = format!(
                    "several sources share the base name '{}'; the last one wins",
                    image.base
                );
                self.reporter.report(ProgressEvent::Warning {
                    image: Some(image.base.clone()),
                    message: message.clone(),
                });
                summary.warnings.push(message);
            }
            summary.images += 1;
            summary.variants_written += image.written;
            summary.warnings.extend(image.warnings);
            manifest.insert(image.base, image.entry);
        }

        let manifest_path = ctx.manifest_path();
        manifest.save(&manifest_path)?;
        self.reporter.report(ProgressEvent::ManifestWritten {
            path: ctx.display_path(&manifest_path),
            entries: manifest.len(),
        });

        summary.total_bytes = manifest.total_bytes();
        summary.manifest_path = Some(manifest_path);
        summary.manifest = manifest;
        summary.duration = start.elapsed();

        self.reporter.report(ProgressEvent::RunCompleted {
            images: summary.images,
            variants: summary.variants_written,
            bytes: summary.total_bytes,
            duration_ms: summary.duration.as_millis() as u64,
        });

        Ok(summary)
    }

    /// Spread images over a bounded worker pool; widths stay sequential
    /// within an image. Sources sharing a base name write the same files, so
    /// each such group runs on one worker in sorted order. Results keep
    /// source order.
    fn process_parallel(&self, sources: &[PathBuf]) -> Result<Vec<ProcessedImage>, PipelineError> {
        let groups = group_by_base(sources);
        let pool = rayon::ThreadPoolBuilder::new().num_threads(self.context.jobs()).build()?;

        let results: Vec<Vec<(usize, ProcessedImage)>> = pool.install(|| {
            groups
                .par_iter()
                .map(|group| {
                    group
                        .iter()
                        .map(|&(index, path)| self.process_image(path).map(|image| (index, image)))
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut processed: Vec<(usize, ProcessedImage)> = results.into_iter().flatten().collect();
        processed.sort_by_key(|(index, _)| *index);
        Ok(processed.into_iter().map(|(_, image)| image).collect())
    }

    /// Write every configured width of one source image.
    fn process_image(&self, path: &Path) -> Result<ProcessedImage, PipelineError> {
        let ctx = &self.context;
        let base = base_name(path);
        let out_dir = ctx.out_dir();
        let asset_root = ctx.asset_root();

        let source = SourceImage::open(path)?;

        let mut entry = ManifestEntry::new();
        let mut written = 0;
        let mut warnings = Vec::new();

        for &target in ctx.widths() {
            let encoded = source.variant(target, ctx.quality())?;

            let out_path = out_dir.join(variant_file_name(&base, encoded.width));
            fs::write(&out_path, &encoded.data)
                .map_err(|source| PipelineError::Write { path: out_path.clone(), source })?;
            written += 1;

            let bytes = encoded.data.len() as u64;
            let replaced = entry.record(Variant {
                width: encoded.width,
                height: encoded.height,
                src: relative_src(&asset_root, &out_path),
                bytes,
            });
            if replaced {
                let message =
                    format!("width {} collapses to {}px (source is narrower)", target, encoded.width);
                if ctx.is_verbose() {
                    self.reporter.report(ProgressEvent::Warning {
                        image: Some(base.clone()),
                        message: message.clone(),
                    });
                }
                warnings.push(format!("{}: {}", base, message));
            }

            self.reporter.report(ProgressEvent::VariantWritten {
                image: base.clone(),
                width: encoded.width,
                bytes,
                path: ctx.display_path(&out_path),
            });
        }

        Ok(ProcessedImage { base, entry, written, warnings })
    }
}

/// Sources grouped by base name, each group in source order, paired with
/// their position in `sources`.
fn group_by_base(sources: &[PathBuf]) -> Vec<Vec<(usize, &Path)>> {
    let mut groups: Vec<Vec<(usize, &Path)>> = Vec::new();
    let mut by_base: HashMap<String, usize> = HashMap::new();
    for (index, path) in sources.iter().enumerate() {
        let slot = *by_base.entry(base_name(path)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push((index, path.as_path()));
    }
    groups
}
