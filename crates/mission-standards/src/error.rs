//! Error types for catalog loading.

use std::path::PathBuf;

use mission_model::{ModelError, StageNumber};
use thiserror::Error;

/// Errors that can occur when loading a stage catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not valid TOML or does not match the stage schema.
    #[error("Failed to parse catalog: {0}")]
    Toml(#[from] toml::de::Error),

    /// A stage violates its own invariants.
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Catalog contains no stages")]
    Empty,

    #[error("Stage {number} is listed more than once")]
    DuplicateStage { number: StageNumber },

    /// Stages must be numbered 1..=N in order.
    #[error("Expected stage {expected} at position {position}, found stage {found}")]
    OutOfOrder {
        position: usize,
        expected: StageNumber,
        found: StageNumber,
    },

    #[error("Stage {stage} lists qr-set answer '{answer}' more than once")]
    DuplicateAnswer { stage: StageNumber, answer: String },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
