//! Configuration for a crawl run
//!
//! The configuration is assembled from command-line flags (see the binary)
//! or built directly by library callers, then validated before any crawling
//! starts.

mod types;
mod validation;

pub use types::{
    CrawlConfig, DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, DEFAULT_WORKERS,
};
pub use validation::validate;
