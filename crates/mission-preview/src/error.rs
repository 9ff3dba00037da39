//! Error types for preview resolution.

use thiserror::Error;

use crate::response::PreviewResponse;

/// Errors raised while resolving a preview. They never reach the player:
/// every one maps to a [`PreviewResponse`] through [`PreviewError::fallback`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreviewError {
    /// Value is neither an image reference nor an http(s) URL.
    #[error("not a previewable URL: {0}")]
    InvalidUrl(String),

    /// The fetch did not finish within the timeout.
    #[error("preview request timed out")]
    Timeout,

    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// Preview endpoint answered with a non-success status.
    #[error("preview endpoint returned status {0}")]
    Status(u16),

    /// Preview endpoint answered with something other than a preview body.
    #[error("malformed preview response: {0}")]
    Malformed(String),
}

impl PreviewError {
    /// Returns a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidUrl(_) => "This code does not point to a web page.",
            Self::Timeout => "The page took too long to answer.",
            Self::Network(_) | Self::Status(_) => "The page could not be loaded.",
            Self::Malformed(_) => "The preview could not be read.",
        }
    }

    /// Returns whether a retry could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_) | Self::Status(_))
    }

    /// Response shown instead of a preview for `target`.
    pub fn fallback(&self, target: &str) -> PreviewResponse {
        match self {
            Self::InvalidUrl(_) => PreviewResponse::Unknown,
            _ => PreviewResponse::iframe(target),
        }
    }
}

impl From<reqwest::Error> for PreviewError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Result type alias for preview operations.
pub type Result<T> = std::result::Result<T, PreviewError>;
