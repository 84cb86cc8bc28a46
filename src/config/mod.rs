//! Configuration module for the image pipeline
//!
//! Provides types and parsing for `respimg.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config, ConfigError, CliOverrides};
pub use schema::*;
