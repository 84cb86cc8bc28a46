//! Pipeline progress reporting.
//!
//! The pipeline emits [`ProgressEvent`]s to a [`ProgressReporter`]. The
//! console reporter prints one human-readable line per written variant,
//! e.g.
//!
//! ```text
//! ✔ stage → 800px (47.1 kB) → src/assets/images/optimized/stage-800.webp
//! ```
//!
//! The JSON reporter writes one object per line for tooling.

use serde::Serialize;
use std::io::{IsTerminal, Write};
use std::sync::Mutex;

/// Events that can be reported during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Processing is about to start
    RunStarted {
        /// Qualifying source images
        images: usize,
        /// Configured widths per image
        widths: usize,
        /// Worker threads
        jobs: usize,
    },
    /// The source directory holds no qualifying images
    NoSources {
        /// Source directory as displayed
        dir: String,
    },
    /// A variant file was written
    VariantWritten {
        /// Source base name
        image: String,
        /// Effective width
        width: u32,
        /// Encoded size
        bytes: u64,
        /// Output path as displayed
        path: String,
    },
    /// The manifest was written
    ManifestWritten {
        /// Manifest path as displayed
        path: String,
        /// Number of entries
        entries: usize,
    },
    /// The run finished successfully
    RunCompleted {
        /// Images processed
        images: usize,
        /// Variant files written
        variants: usize,
        /// Bytes written across variants
        bytes: u64,
        /// Duration in milliseconds
        duration_ms: u64,
    },
    /// A warning was generated
    Warning {
        /// Image that generated the warning (if applicable)
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        /// Warning message
        message: String,
    },
    /// An error occurred
    Error {
        /// Image that generated the error (if applicable)
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        /// Error message
        message: String,
    },
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);

    /// Check if this reporter wants verbose output.
    fn is_verbose(&self) -> bool {
        false
    }
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    /// Create a new null progress reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Console progress reporter with optional colors.
///
/// Progress goes to stdout and errors to stderr unless a custom writer is
/// installed, in which case everything goes to that writer.
pub struct ConsoleProgress {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
    /// Progress output
    output: Mutex<Box<dyn Write + Send>>,
    /// Error output; `None` shares `output`
    errors: Option<Mutex<Box<dyn Write + Send>>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a console reporter on stdout/stderr, colored when stdout is a
    /// terminal.
    pub fn new() -> Self {
        Self {
            use_colors: std::io::stdout().is_terminal(),
            verbose: false,
            output: Mutex::new(Box::new(std::io::stdout())),
            errors: Some(Mutex::new(Box::new(std::io::stderr()))),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false,
            verbose: false,
            output: Mutex::new(Box::new(output)),
            errors: None,
        }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }

    fn ewriteln(&self, line: &str) {
        match &self.errors {
            Some(errors) => {
                if let Ok(mut errors) = errors.lock() {
                    let _ = writeln!(errors, "{}", line);
                }
            }
            None => self.writeln(line),
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { images, widths, jobs } => {
                if self.verbose {
                    self.writeln(&format!(
                        "{} {} image{} × {} width{} ({} job{})",
                        self.cyan("[build]"),
                        images,
                        plural(images),
                        widths,
                        plural(widths),
                        jobs,
                        plural(jobs)
                    ));
                }
            }
            ProgressEvent::NoSources { dir } => {
                self.writeln(&format!("No source images found in {}", dir));
            }
            ProgressEvent::VariantWritten { image, width, bytes, path } => {
                self.writeln(&format!(
                    "{} {} → {}px ({} kB) → {}",
                    self.green("✔"),
                    image,
                    width,
                    format_kb(bytes),
                    path
                ));
            }
            ProgressEvent::ManifestWritten { path, .. } => {
                self.writeln(&format!("\nManifest written to {}", path));
            }
            ProgressEvent::RunCompleted { images, variants, bytes, duration_ms } => {
                if self.verbose {
                    self.writeln(&format!(
                        "{} {} variant{} from {} image{}, {} kB in {}",
                        self.green("[done]"),
                        variants,
                        plural(variants),
                        images,
                        plural(images),
                        format_kb(bytes),
                        format_duration(duration_ms)
                    ));
                }
            }
            ProgressEvent::Warning { image, message } => {
                let prefix = image.map(|i| format!("{}: ", i)).unwrap_or_default();
                self.writeln(&format!("{} {}{}", self.yellow("[warn]"), prefix, message));
            }
            ProgressEvent::Error { image, message } => {
                let prefix = image.map(|i| format!("{}: ", i)).unwrap_or_default();
                self.ewriteln(&format!("{} {}{}", self.red("[error]"), prefix, message));
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// JSON progress reporter for machine-readable output.
pub struct JsonProgress {
    /// Output writer
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonProgress").finish()
    }
}

impl JsonProgress {
    /// Create a new JSON progress reporter writing to stdout.
    pub fn new() -> Self {
        Self { output: Mutex::new(Box::new(std::io::stdout())) }
    }

    /// Create a JSON progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { output: Mutex::new(Box::new(output)) }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        let Ok(json) = serde_json::to_string(&event) else {
            return;
        };
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", json);
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Kilobytes with one decimal, as printed in variant lines.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0)
}

/// Format a duration in milliseconds to a human-readable string.
fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}
