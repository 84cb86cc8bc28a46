//! Srcset and resolve command implementations

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::optimize::resolve_config;
use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::build::{BuildContext, Manifest};
use crate::resolve::{AssetResolver, AssetTable, PictureOptions};

fn load_table(path: &Path) -> Result<AssetTable, ExitCode> {
    AssetTable::load(path).map_err(|e| {
        eprintln!("Error: cannot read lookup table {}: {}", path.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Manifest path given on the command line, or the configured one.
fn manifest_path(explicit: Option<&Path>) -> Result<PathBuf, ExitCode> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    match resolve_config(None, false) {
        Ok((config, root)) => Ok(BuildContext::new(config, root).manifest_path()),
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            Err(ExitCode::from(EXIT_INVALID_ARGS))
        }
    }
}

/// Run the srcset command
pub fn run_srcset(
    key: &str,
    table: &Path,
    manifest: Option<&Path>,
    widths: Option<&[u32]>,
) -> ExitCode {
    let table = match load_table(table) {
        Ok(table) => table,
        Err(code) => return code,
    };
    let manifest_path = match manifest_path(manifest) {
        Ok(path) => path,
        Err(code) => return code,
    };
    let manifest = match Manifest::load(&manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Error: cannot read manifest {}: {}", manifest_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let options = widths.map(PictureOptions::for_widths).unwrap_or_default();
    let resolver = AssetResolver::new(table, manifest);
    let picture = resolver.picture_with(key, &options);

    if picture.is_missing() {
        eprintln!("Warning: nothing resolved for '{}'", key);
    }
    println!("src: {}", picture.src.as_deref().unwrap_or(""));
    println!("srcset: {}", picture.srcset());
    println!("width: {}", picture.width);
    println!("height: {}", picture.height);

    ExitCode::from(EXIT_SUCCESS)
}

/// Run the resolve command
pub fn run_resolve(path: &str, table: &Path) -> ExitCode {
    let table = match load_table(table) {
        Ok(table) => table,
        Err(code) => return code,
    };

    match crate::resolve::resolve(&table, Some(path)) {
        Some(url) => {
            println!("{}", url);
            ExitCode::from(EXIT_SUCCESS)
        }
        None => {
            eprintln!("No asset matches '{}'", path);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
