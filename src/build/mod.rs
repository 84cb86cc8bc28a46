//! Image build pipeline
//!
//! Turns a directory of source photos into responsive WebP variants plus a
//! JSON manifest describing them.
//!
//! # Overview
//!
//! - **Discovery**: list qualifying source files (flat, case-sensitive
//!   extension match)
//! - **Variants**: decode with orientation applied, resize to
//!   `min(target, source width)`, encode lossy WebP
//! - **Manifest**: record width, height, size and asset-root-relative path
//!   of every variant, then write `manifest.json`
//!
//! # Example
//!
//! ```ignore
//! use respimg::build::{BuildContext, ImagePipeline};
//! use respimg::config::load_config;
//!
//! let config = load_config(None)?;
//! let context = BuildContext::new(config, project_root);
//! let summary = ImagePipeline::new(context).run()?;
//! println!("{}", summary.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod manifest;
pub mod pipeline;
pub mod progress;
pub mod result;
pub mod variant;

pub use context::*;
pub use discovery::*;
pub use manifest::*;
pub use pipeline::*;
pub use result::*;
pub use variant::*;
