//! respimg - Command-line tool for generating responsive WebP image variants

use std::process::ExitCode;

use respimg::cli;

fn main() -> ExitCode {
    cli::run()
}
