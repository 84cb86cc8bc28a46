//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations. Running the binary without a
//! subcommand runs `optimize` with the project's configuration.

mod optimize;
mod srcset;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// respimg - Generate responsive WebP variants and resolve their served URLs
#[derive(Parser)]
#[command(name = "respimg")]
#[command(about = "Generate responsive WebP variants and a manifest; resolve served asset URLs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resize source images into WebP variants and write the manifest (default)
    Optimize(OptimizeArgs),

    /// Print img attributes (src, srcset, width, height) for an image key
    Srcset {
        /// Manifest key, e.g. "stage"
        key: String,

        /// Lookup table JSON mapping original asset paths to served URLs
        #[arg(short, long)]
        table: PathBuf,

        /// Manifest file (default: the configured output manifest)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Candidate widths, comma-separated (default: 800,1200,1600)
        #[arg(long, value_delimiter = ',')]
        widths: Option<Vec<u32>>,
    },

    /// Resolve one manifest path against a lookup table
    Resolve {
        /// Manifest-relative path, e.g. assets/images/optimized/stage-800.webp
        path: String,

        /// Lookup table JSON mapping original asset paths to served URLs
        #[arg(short, long)]
        table: PathBuf,
    },
}

/// Options of the optimize command; all optional
#[derive(Args, Debug, Default, Clone)]
pub struct OptimizeArgs {
    /// Config file (default: respimg.toml found by walking up from the cwd)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source image directory
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Output directory for variants and manifest
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Target widths, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub widths: Option<Vec<u32>>,

    /// WebP quality (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Worker threads (1 = strictly sequential)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Emit progress as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Show run and collapse details
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        None => optimize::run_optimize(&OptimizeArgs::default()),
        Some(Commands::Optimize(args)) => optimize::run_optimize(&args),
        Some(Commands::Srcset { key, table, manifest, widths }) => {
            srcset::run_srcset(&key, &table, manifest.as_deref(), widths.as_deref())
        }
        Some(Commands::Resolve { path, table }) => srcset::run_resolve(&path, &table),
    }
}
