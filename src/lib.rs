//! Hostbound: a single-host web crawler
//!
//! Given a starting HTTP(S) URL, this crate visits every page reachable from
//! it whose hostname matches the start hostname, and for each visited page
//! emits the page URL together with the absolute, normalized links it
//! contains. Other hosts are reported as links but never fetched.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Crawl-level error type
///
/// Per-page failures never surface here; they are recovered inside the crawl
/// loop and accounted in the error counter. The only errors a caller of
/// [`crawler::Coordinator::crawl`] sees are configuration failures and
/// cancellation.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("crawl cancelled")]
    Cancelled,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid start URL: {0}")]
    InvalidStartUrl(String),

    #[error("start URL must use http or https scheme, got {0}")]
    UnsupportedScheme(String),

    #[error("worker count must be at least 1")]
    NoWorkers,
}

/// Per-page error carried in a worker result
///
/// Every failed page still appears in the output with an empty link list;
/// the coordinator logs the error with its [`ErrorCategory`] tag and moves on.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("{} ({status})", status_phrase(.status))]
    Http { status: u16, url: String },

    #[error("fetch failed: {message}")]
    Network { url: String, message: String },

    #[error("fetch cancelled")]
    Cancelled { url: String },

    #[error("parse failed: {message}")]
    Parse { url: String, message: String },

    #[error("worker panic: {message}")]
    WorkerAbort { message: String },
}

fn status_phrase(status: &u16) -> &'static str {
    match *status {
        404 => "not found",
        300..=399 => "redirect not followed",
        400..=499 => "client error",
        500..=599 => "server error",
        _ => "unexpected status",
    }
}

/// Error categories used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    DeadLink,
    ServerError,
    Timeout,
    ClientError,
    RedirectNotFollowed,
    NetworkError,
    Cancelled,
    ParseFailure,
    WorkerAbort,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeadLink => "dead link",
            Self::ServerError => "server error (retry-able)",
            Self::Timeout => "timeout",
            Self::ClientError => "client error",
            Self::RedirectNotFollowed => "redirect not followed",
            Self::NetworkError => "network error",
            Self::Cancelled => "cancelled",
            Self::ParseFailure => "parse error",
            Self::WorkerAbort => "worker abort",
        }
    }
}

impl PageError {
    /// Maps the error to its diagnostic category.
    ///
    /// HTTP statuses are split the way operators care about them: 404 is a
    /// dead link, 5xx is retry-able, 408/504 are timeouts regardless of their
    /// class, and anything else in 4xx is the requester's fault.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http { status, .. } => match *status {
                404 => ErrorCategory::DeadLink,
                408 | 504 => ErrorCategory::Timeout,
                500..=599 => ErrorCategory::ServerError,
                300..=399 => ErrorCategory::RedirectNotFollowed,
                _ => ErrorCategory::ClientError,
            },
            Self::Network { .. } => ErrorCategory::NetworkError,
            Self::Cancelled { .. } => ErrorCategory::Cancelled,
            Self::Parse { .. } => ErrorCategory::ParseFailure,
            Self::WorkerAbort { .. } => ErrorCategory::WorkerAbort,
        }
    }

    /// The URL the error originated from, when one is attached.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Http { url, .. }
            | Self::Network { url, .. }
            | Self::Cancelled { url }
            | Self::Parse { url, .. } => Some(url),
            Self::WorkerAbort { .. } => None,
        }
    }
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{Coordinator, Fetched, Fetcher, PageResult, Parser, WorkItem};
pub use output::OutputFormat;
