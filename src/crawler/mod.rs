//! Crawler module: coordination core and the fetch/parse seams
//!
//! This module contains the crawl coordination logic, including:
//! - The coordinator, which owns all mutable crawl state
//! - Stateless workers that fetch and parse pages
//! - The HTTP fetcher and HTML parser implementations behind trait seams
//!
//! The coordinator is the only component that touches the visited set, the
//! outstanding-work counter, and the output stream. Workers communicate with
//! it exclusively through channels: one work item in, exactly one result out.

mod coordinator;
mod fetcher;
mod parser;
mod worker;

pub use coordinator::Coordinator;
pub use fetcher::HttpFetcher;
pub use parser::LinkParser;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::PageError;

/// A single URL to be fetched and parsed by a worker.
///
/// The URL is already absolute, normalized, and in scope by the time the
/// coordinator enqueues it.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub url: String,
}

/// The outcome of one fetch: body bytes, the URL the response actually came
/// from after redirects, and the Content-Type header value.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub body: Vec<u8>,
    pub final_url: String,
    pub content_type: String,
}

/// The outcome of processing a single [`WorkItem`].
///
/// Workers send exactly one of these per work item, even on error or panic;
/// the coordinator's outstanding-work counter depends on it.
#[derive(Debug)]
pub struct PageResult {
    /// The URL that was requested (same as the work item's).
    pub url: String,
    /// The URL the page was actually served from, after redirects.
    pub final_url: String,
    /// Raw href strings as extracted; `None` when fetch or parse failed.
    pub links: Option<Vec<String>>,
    /// The failure, if any. `None` together with empty links means a page
    /// with nothing to extract (e.g. non-HTML content).
    pub err: Option<PageError>,
}

/// Error returned by a [`Parser`] implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ParseError(pub String);

/// Interface for fetching HTTP content.
///
/// Implementations must honor cancellation during blocking operations,
/// follow redirects and surface the final URL, treat any status outside
/// [200, 300) as an error, and cap the response body size.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, cancel: &CancellationToken, url: &str) -> Result<Fetched, PageError>;
}

/// Interface for extracting links from HTML.
///
/// Returns raw href strings exactly as they appear in the source, from
/// `<a>` elements only. Must not fail on malformed HTML.
pub trait Parser: Send + Sync {
    fn extract_links(&self, body: &[u8]) -> Result<Vec<String>, ParseError>;
}
