//! Output formatting for crawl data
//!
//! Crawl data (visited pages and their links) goes to the configured sink in
//! one of two formats; diagnostics never mix into it. Links printed here have
//! already been normalized with the exact rules the visited set uses, so the
//! printed form and the dedup key are always the same string.

mod format;
mod stats;

pub use format::{write_record, write_text, PageRecord};
pub use stats::{log_summary, CrawlStats};

use clap::ValueEnum;

/// Output format for crawl data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable blocks: a `Visited:` line, a `Links found:` header,
    /// then one link per line.
    #[default]
    Text,
    /// Newline-delimited JSON records, one object per page.
    Records,
}
