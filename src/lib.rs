//! respimg - Responsive image variants and asset URL resolution
//!
//! This library provides functionality to:
//! - Resize source photographs into WebP variants at fixed widths
//! - Record every variant in a JSON manifest keyed by image and width
//! - Resolve manifest paths to the URLs assigned by the asset bundler
//! - Assemble `src`/`srcset`/dimension data for display components

pub mod build;
pub mod cli;
pub mod config;
pub mod resolve;
