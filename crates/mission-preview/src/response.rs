use serde::{Deserialize, Serialize};

/// Body returned by the preview service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreviewResponse {
    /// Show the image at `url`.
    Image { url: String },
    /// Embed the page at `url`.
    Iframe { url: String },
    /// Not something that can be previewed.
    Unknown,
}

impl PreviewResponse {
    pub fn iframe(url: impl Into<String>) -> Self {
        PreviewResponse::Iframe { url: url.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        PreviewResponse::Image { url: url.into() }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            PreviewResponse::Image { url } | PreviewResponse::Iframe { url } => Some(url),
            PreviewResponse::Unknown => None,
        }
    }

    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(_) => r#"{"type":"unknown"}"#.to_string(),
        }
    }
}

/// HTTP status plus body, as the service would answer a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewReply {
    pub status: u16,
    pub response: PreviewResponse,
}

impl PreviewReply {
    pub fn ok(response: PreviewResponse) -> Self {
        Self {
            status: 200,
            response,
        }
    }

    pub fn bad_request() -> Self {
        Self {
            status: 400,
            response: PreviewResponse::Unknown,
        }
    }

    pub fn body(&self) -> String {
        self.response.to_json()
    }
}
