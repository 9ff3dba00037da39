//! Preview resolution service.
//!
//! Answers the question "what should a scan of this URL show?" with an
//! image, an embedded page, or nothing. Failures never escape: every error
//! is mapped to a fallback response.

use tracing::{debug, warn};
use url::Url;

use crate::error::Result;
use crate::extract::extract_image;
use crate::fetch::{Fetcher, HttpFetcher, PreviewConfig};
use crate::hint::{Hint, classify, is_image_reference};
use crate::response::{PreviewReply, PreviewResponse};

/// Query parameter carrying the target URL.
pub const URL_PARAM: &str = "url";

pub struct PreviewService<F: Fetcher> {
    fetcher: F,
}

impl PreviewService<HttpFetcher> {
    /// Service backed by a real HTTP client.
    pub fn http(config: &PreviewConfig) -> Result<Self> {
        Ok(Self::new(HttpFetcher::new(config)?))
    }
}

impl<F: Fetcher> PreviewService<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve a target given as the raw `url` parameter.
    pub fn resolve(&self, target: Option<&str>) -> PreviewReply {
        let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) else {
            return PreviewReply::bad_request();
        };
        match classify(target) {
            Hint::Unknown => {
                debug!(target, "scan is not previewable");
                PreviewReply::bad_request()
            }
            Hint::Image => PreviewReply::ok(PreviewResponse::image(target)),
            Hint::Fetch => match self.resolve_page(target) {
                Ok(response) => PreviewReply::ok(response),
                Err(err) => {
                    warn!(target, error = %err, "preview fetch failed, using fallback");
                    PreviewReply::ok(err.fallback(target))
                }
            },
        }
    }

    /// Resolve from a query string such as `url=https%3A%2F%2F...`.
    pub fn resolve_query(&self, query: &str) -> PreviewReply {
        let target = url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .find(|(key, _)| key == URL_PARAM)
            .map(|(_, value)| value.into_owned());
        self.resolve(target.as_deref())
    }

    fn resolve_page(&self, target: &str) -> Result<PreviewResponse> {
        let page = self.fetcher.fetch(target)?;
        if !page.is_success() {
            debug!(target, status = page.status, "preview target answered with an error status");
        }
        if page.is_image() {
            return Ok(PreviewResponse::image(page.final_url));
        }

        let Some(body) = page.body.as_deref().filter(|_| page.is_html()) else {
            return Ok(PreviewResponse::iframe(target));
        };
        let Ok(base) = Url::parse(&page.final_url) else {
            return Ok(PreviewResponse::iframe(target));
        };

        match extract_image(body, &base) {
            Some(candidate) if is_image_reference(&candidate) => {
                Ok(PreviewResponse::image(candidate))
            }
            Some(candidate) => {
                debug!(%candidate, "extracted candidate is not an image");
                Ok(PreviewResponse::iframe(target))
            }
            None => Ok(PreviewResponse::iframe(target)),
        }
    }
}
