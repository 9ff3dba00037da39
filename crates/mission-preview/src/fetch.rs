//! Page fetching for preview resolution.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tracing::{debug, trace};

use crate::error::{PreviewError, Result};

/// Fetch timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3500);

/// User agent sent with every fetch.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Settings for the HTTP fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// What came back from a fetch, after redirects. Pages are classified by
/// content type whatever their status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status of the final response.
    pub status: u16,
    /// URL of the final response.
    pub final_url: String,
    /// Lower-cased `Content-Type`, empty when the header is missing.
    pub content_type: String,
    /// Body text, only read for HTML responses.
    pub body: Option<String>,
}

impl FetchedPage {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn is_html(&self) -> bool {
        self.content_type.contains("text/html")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of pages. The HTTP implementation is [`HttpFetcher`]; tests plug in
/// canned pages.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// Blocking `reqwest` fetcher following redirects.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: &PreviewConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PreviewError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage> {
        debug!(url, "fetching preview target");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        trace!(status, %final_url, %content_type, "preview target answered");

        let mut page = FetchedPage {
            status,
            final_url,
            content_type,
            body: None,
        };
        if page.is_html() {
            page.body = Some(response.text()?);
        }
        Ok(page)
    }
}
