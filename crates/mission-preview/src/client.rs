//! Caller side of the preview service.
//!
//! A scan handler asks a [`PreviewSource`] for a reply and turns it into
//! something displayable. Anything other than a well-formed OK reply shows
//! the scanned page in an iframe.

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, warn};
use url::Url;

use crate::error::{PreviewError, Result};
use crate::fetch::{Fetcher, PreviewConfig};
use crate::response::{PreviewReply, PreviewResponse};
use crate::service::{PreviewService, URL_PARAM};

/// Anything that can answer a preview request with status and body.
pub trait PreviewSource {
    fn request(&self, target: &str) -> Result<(u16, String)>;
}

impl<T: PreviewSource + ?Sized> PreviewSource for Box<T> {
    fn request(&self, target: &str) -> Result<(u16, String)> {
        (**self).request(target)
    }
}

impl<F: Fetcher> PreviewSource for PreviewService<F> {
    fn request(&self, target: &str) -> Result<(u16, String)> {
        let PreviewReply { status, response } = self.resolve(Some(target));
        Ok((status, response.to_json()))
    }
}

/// A preview service deployed behind an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct RemoteEndpoint {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl RemoteEndpoint {
    pub fn new(endpoint: &str, config: &PreviewConfig) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| PreviewError::InvalidUrl(format!("{endpoint}: {e}")))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PreviewError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            user_agent: config.user_agent.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Endpoint URL with the `url` parameter set to `target`.
    pub fn request_url(&self, target: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(URL_PARAM, target);
        url
    }
}

impl PreviewSource for RemoteEndpoint {
    fn request(&self, target: &str) -> Result<(u16, String)> {
        let url = self.request_url(target);
        debug!(%url, "requesting remote preview");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok((status, body))
    }
}

/// Parse a reply body.
pub fn parse_reply(body: &str) -> Result<PreviewResponse> {
    Ok(serde_json::from_str(body)?)
}

/// Turn a raw reply into a response. Non-OK statuses and unreadable bodies
/// fall back to an iframe of `target`.
pub fn interpret(target: &str, status: u16, body: &str) -> PreviewResponse {
    if !(200..300).contains(&status) {
        debug!(status, "preview endpoint refused, showing page");
        return PreviewError::Status(status).fallback(target);
    }
    match parse_reply(body) {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "unreadable preview reply, showing page");
            err.fallback(target)
        }
    }
}

/// Scan-side preview lookup.
pub struct PreviewClient<S: PreviewSource> {
    source: S,
}

impl<S: PreviewSource> PreviewClient<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Preview for a scanned value. Never fails.
    pub fn preview(&self, target: &str) -> PreviewResponse {
        match self.source.request(target) {
            Ok((status, body)) => interpret(target, status, &body),
            Err(err) => {
                warn!(target, error = %err, "preview request failed, showing page");
                PreviewResponse::iframe(target)
            }
        }
    }
}
