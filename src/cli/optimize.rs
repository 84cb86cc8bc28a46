//! Optimize command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use super::{OptimizeArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::build::progress::{ConsoleProgress, JsonProgress, ProgressEvent, ProgressReporter};
use crate::build::{BuildContext, ImagePipeline};
use crate::config::loader::{check, find_config, load_config, merge_cli_overrides, project_root};
use crate::config::{default_config, CliOverrides, ConfigError, RespimgConfig};

/// Load configuration and project root for the given explicit config path,
/// falling back to discovery and then to defaults rooted at the cwd.
pub(crate) fn resolve_config(
    explicit: Option<&Path>,
    verbose: bool,
) -> Result<(RespimgConfig, PathBuf), ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config_path = explicit.map(Path::to_path_buf).or_else(find_config);

    match config_path {
        Some(path) => {
            if verbose {
                println!("Using config: {}", path.display());
            }
            let config = load_config(Some(&path))?;
            // root must be absolute to share a prefix with an absolute --out
            let root = match project_root(&path).filter(|p| !p.as_os_str().is_empty()) {
                Some(dir) if dir.is_absolute() => dir.to_path_buf(),
                Some(dir) => cwd.join(dir),
                None => cwd,
            };
            Ok((config, root))
        }
        None => {
            if verbose {
                println!("No respimg.toml found, using defaults");
            }
            Ok((default_config(), cwd))
        }
    }
}

/// Run the optimize command
pub fn run_optimize(args: &OptimizeArgs) -> ExitCode {
    let (mut config, root) = match resolve_config(args.config.as_deref(), args.verbose) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let overrides = CliOverrides {
        src: args.src.clone(),
        out: args.out.clone(),
        widths: args.widths.clone(),
        quality: args.quality,
        jobs: args.jobs,
    };
    merge_cli_overrides(&mut config, &overrides);
    let config = match check(config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let context = BuildContext::new(config, root).with_verbose(args.verbose);
    let reporter: Arc<dyn ProgressReporter> = if args.json {
        Arc::new(JsonProgress::new())
    } else {
        Arc::new(ConsoleProgress::new().with_verbose(args.verbose))
    };

    match ImagePipeline::new(context).with_reporter(Arc::clone(&reporter)).run() {
        Ok(summary) => {
            if args.verbose && !args.json {
                println!("{}", summary.summary());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            if args.json {
                reporter.report(ProgressEvent::Error { image: None, message: e.to_string() });
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}
