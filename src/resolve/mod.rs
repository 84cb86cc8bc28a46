//! Asset resolver
//!
//! Maps manifest paths to the URLs assigned by the packaging step, and
//! assembles `srcset` data for display components. Everything here is pure
//! and synchronous; a miss is `None`.
//!
//! ```ignore
//! use respimg::build::Manifest;
//! use respimg::resolve::{self, AssetResolver, AssetTable};
//!
//! let table = AssetTable::load("dist/assets.json".as_ref())?;
//! let manifest = Manifest::load("src/assets/images/optimized/manifest.json".as_ref())?;
//! let resolver = resolve::install(AssetResolver::new(table, manifest))?;
//! let hero = resolver.picture("stage");
//! ```

pub mod picture;
pub mod resolver;
pub mod table;

pub use picture::{Candidate, PictureOptions, ResponsiveImage};
pub use resolver::{global, global_or_init, install, normalize, resolve, AlreadyInstalled, AssetResolver};
pub use table::{AssetTable, TableError};
