//! Persistence error types.

use std::path::PathBuf;
use thiserror::Error;

/// Session persistence error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} session file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Session file is not a JSON object of strings.
    #[error("Session file {path} is not valid")]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize session state")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Temp file couldn't be renamed over the session file.
    #[error("Failed to complete session save")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the session file at {}", operation, path.display()),
            Self::InvalidFormat { path, .. } => format!(
                "The session file at {} is damaged; progress starts fresh",
                path.display()
            ),
            Self::Serialization { .. } => "Session state could not be encoded".to_string(),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not replace the session file at {}",
                target_path.display()
            ),
        }
    }
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
