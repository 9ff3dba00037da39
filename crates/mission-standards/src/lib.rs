//! Stage catalog for the mission stage engine.
//!
//! The default catalog is embedded at compile time from `data/stages.toml`;
//! an alternate catalog can be loaded from disk with the same schema.
//!
//! # Example
//!
//! ```rust,ignore
//! use mission_standards::load_default_catalog;
//!
//! let catalog = load_default_catalog()?;
//! for stage in &catalog {
//!     println!("{} {}", stage.id(), stage.kind());
//! }
//! ```

pub mod catalog;
pub mod error;

pub use catalog::{EMBEDDED_CATALOG, StageCatalog, load_catalog, load_default_catalog, parse_catalog};
pub use error::{CatalogError, Result};
