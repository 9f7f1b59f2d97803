use std::time::Duration;

use crate::output::OutputFormat;

/// Default number of concurrent fetch workers.
pub const DEFAULT_WORKERS: usize = 8;

/// Default total per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default response body cap (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = "hostbound/1.0";

/// Configuration for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Starting URL; its hostname defines the crawl scope.
    pub start_url: String,

    /// Number of concurrent fetch workers.
    pub workers: usize,

    /// Maximum pages to visit; 0 means unlimited.
    pub max_pages: usize,

    /// Minimum spacing between requests across all workers; `None` means
    /// no limit.
    pub rate: Option<Duration>,

    /// Output format for crawl data.
    pub format: OutputFormat,

    /// Total per-request timeout.
    pub timeout: Duration,

    /// Response body size cap in bytes; overflow is discarded.
    pub max_body_bytes: usize,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl CrawlConfig {
    /// Creates a configuration with defaults for everything but the start URL.
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            workers: DEFAULT_WORKERS,
            max_pages: 0,
            rate: None,
            format: OutputFormat::Text,
            timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
