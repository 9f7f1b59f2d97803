//! Hostbound main entry point
//!
//! Command-line interface for the single-host crawler. Crawl data goes to
//! stdout in the selected format; diagnostics, per-page errors, and the
//! final summary go to stderr.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use hostbound::config::{self, CrawlConfig};
use hostbound::crawler::{Coordinator, HttpFetcher, LinkParser};
use hostbound::output::OutputFormat;
use hostbound::CrawlError;

/// Hostbound: a single-host web crawler
///
/// Crawls every page reachable from the starting URL whose hostname matches
/// the starting hostname, printing each visited page together with the
/// normalized links it contains. Other hosts are reported but never fetched.
#[derive(Parser, Debug)]
#[command(name = "hostbound")]
#[command(version = "1.0.0")]
#[command(about = "A single-host web crawler", long_about = None)]
struct Cli {
    /// Starting URL; only pages on its hostname are fetched
    #[arg(long, value_name = "URL")]
    url: String,

    /// Number of concurrent fetch workers
    #[arg(long, default_value_t = 8)]
    workers: usize,

    /// Maximum pages to visit (0 = unlimited)
    #[arg(long = "max-pages", default_value_t = 0)]
    max_pages: usize,

    /// Minimum milliseconds between requests (0 = no limit)
    #[arg(long = "rate-ms", default_value_t = 0)]
    rate_ms: u64,

    /// Output format for crawl data
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error diagnostics
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = CrawlConfig::new(cli.url);
    config.workers = cli.workers;
    config.max_pages = cli.max_pages;
    config.format = cli.format;
    if cli.rate_ms > 0 {
        config.rate = Some(Duration::from_millis(cli.rate_ms));
    }

    if let Err(e) = config::validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let fetcher = match HttpFetcher::new(&config) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let parser = Arc::new(LinkParser::new());

    let mut coordinator =
        match Coordinator::new(&config, fetcher, parser, Box::new(std::io::stdout())) {
            Ok(coordinator) => coordinator,
            Err(e) => {
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
        };

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    match coordinator.crawl(&cancel).await {
        Ok(stats) => {
            tracing::debug!("{} pages visited", stats.pages_visited);
            ExitCode::SUCCESS
        }
        // Graceful cancellation counts as success for exit-code purposes.
        Err(CrawlError::Cancelled) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Cancels the crawl on SIGINT. In-flight work drains; if the drain takes
/// longer than the shutdown window, the process is forced out.
fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::info!("Interrupt received, finishing in-flight work...");
        cancel.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        tracing::error!("Shutdown timeout exceeded, forcing exit");
        std::process::exit(1);
    });
}

/// Sets up the tracing subscriber based on verbosity level.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hostbound=info,warn"),
            1 => EnvFilter::new("hostbound=debug,info"),
            2 => EnvFilter::new("hostbound=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
