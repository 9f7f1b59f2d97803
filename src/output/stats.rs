use std::time::Duration;

/// Final statistics for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Pages scheduled for a visit (including failed ones).
    pub pages_visited: usize,
    /// Pages whose fetch or parse failed.
    pub errors: usize,
    /// Wall-clock time from seed to termination.
    pub duration: Duration,
}

impl CrawlStats {
    /// Visit throughput; zero when the crawl finished instantly.
    pub fn pages_per_second(&self) -> f64 {
        let seconds = self.duration.as_secs_f64();
        if seconds > 0.0 {
            self.pages_visited as f64 / seconds
        } else {
            0.0
        }
    }
}

/// Logs the end-of-crawl summary to the diagnostic stream.
pub fn log_summary(stats: &CrawlStats) {
    tracing::info!(
        "Crawl finished: {} pages visited, {} errors, {:.2?} elapsed",
        stats.pages_visited,
        stats.errors,
        stats.duration
    );
    tracing::info!("Rate: {:.2} pages/sec", stats.pages_per_second());
}
