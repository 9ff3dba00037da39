//! QR preview resolution.
//!
//! A scanned value is classified first: direct image references are shown
//! as-is, web pages are fetched and scraped for an image, everything else is
//! not previewable. Fetch failures fall back to embedding the page.
//!
//! - [`PreviewService`] resolves a target into a [`PreviewReply`].
//! - [`PreviewClient`] consumes replies from any [`PreviewSource`], in-process
//!   or remote, and never fails.
//! - [`ScanSession`] serialises scans with a lock and discards stale replies.

pub mod client;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod hint;
pub mod response;
pub mod service;
pub mod session;

pub use client::{PreviewClient, PreviewSource, RemoteEndpoint, interpret, parse_reply};
pub use error::{PreviewError, Result};
pub use extract::{decode_candidate, extract_image};
pub use fetch::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FetchedPage, Fetcher, HttpFetcher, PreviewConfig,
};
pub use hint::{Hint, classify, is_http_url, is_image_reference};
pub use response::{PreviewReply, PreviewResponse};
pub use service::{PreviewService, URL_PARAM};
pub use session::{ScanSession, ScanState, ScanTicket};
