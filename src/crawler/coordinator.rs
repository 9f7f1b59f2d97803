//! Crawl coordinator: scheduling, deduplication, and termination
//!
//! The coordinator owns every piece of mutable crawl state: the visited set,
//! the outstanding-work counter, the visit and error counts, and the output
//! writer. Workers are stateless; all scheduling decisions happen here, on a
//! single task, so none of this state needs cross-thread synchronization.
//!
//! Termination rests on one invariant: the outstanding-work counter equals
//! (URLs enqueued) minus (results fully processed). The counter rises before
//! every enqueue and falls only after a result, including all the enqueues it
//! triggered, has been handled. When it returns to zero the work channel is
//! closed, the workers drain out, and the results channel closes behind them.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::worker::worker;
use super::{Fetcher, PageResult, Parser, WorkItem};
use crate::config::CrawlConfig;
use crate::output::{self, CrawlStats, OutputFormat};
use crate::url::{canonical_key, host_of, in_scope, sanitize};
use crate::{ConfigError, CrawlError};

/// The crawl coordinator.
pub struct Coordinator {
    /// Canonical keys of every URL ever scheduled (plus redirect targets).
    visited: HashSet<String>,
    /// URLs enqueued minus results fully processed. Zero means done.
    outstanding: usize,
    start_url: Url,
    start_host: String,
    max_pages: usize,
    num_workers: usize,
    visit_count: usize,
    error_count: usize,
    format: OutputFormat,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn Parser>,
    output: Box<dyn Write + Send>,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration.
    ///
    /// The start URL is normalized here with the same rules used for every
    /// discovered link, so the seed's visited-set key and printed form line
    /// up with everything that follows.
    pub fn new(
        config: &CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn Parser>,
        output: Box<dyn Write + Send>,
    ) -> crate::Result<Self> {
        if config.workers == 0 {
            return Err(ConfigError::NoWorkers.into());
        }

        let parsed = Url::parse(&config.start_url)
            .map_err(|e| ConfigError::InvalidStartUrl(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string()).into()),
        }

        let normalized = sanitize(&config.start_url, &parsed)
            .ok_or_else(|| ConfigError::InvalidStartUrl(config.start_url.clone()))?;
        let start_url = Url::parse(&normalized)
            .map_err(|e| ConfigError::InvalidStartUrl(e.to_string()))?;
        let start_host = host_of(&start_url)
            .ok_or_else(|| ConfigError::InvalidStartUrl("start URL has no host".to_string()))?;

        Ok(Self {
            visited: HashSet::new(),
            outstanding: 0,
            start_url,
            start_host,
            max_pages: config.max_pages,
            num_workers: config.workers,
            visit_count: 0,
            error_count: 0,
            format: config.format,
            fetcher,
            parser,
            output,
        })
    }

    /// The normalized start URL.
    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// The lowercase hostname defining the crawl scope.
    pub fn start_host(&self) -> &str {
        &self.start_host
    }

    /// Runs the crawl to completion and returns the final statistics.
    ///
    /// Per-page failures are recovered internally; the only errors surfaced
    /// here are cancellation before any work could be seeded. Cancellation
    /// observed mid-crawl drains in-flight results and returns normally.
    pub async fn crawl(&mut self, cancel: &CancellationToken) -> crate::Result<CrawlStats> {
        let started = Instant::now();

        // Seed the start URL: mark visited and raise the counter before the
        // enqueue, never after.
        self.visited.insert(canonical_key(self.start_url.as_str()));
        self.visit_count += 1;
        self.outstanding += 1;

        // The buffer must absorb every link the coordinator discovers while
        // processing a single result, or it would deadlock sending to itself.
        let buffer = (self.num_workers * 100).max(100);
        let (work_tx, work_rx) = mpsc::channel::<WorkItem>(buffer);
        let (results_tx, mut results_rx) = mpsc::channel::<PageResult>(self.num_workers);
        let work_rx = Arc::new(Mutex::new(work_rx));

        let mut workers = JoinSet::new();
        for _ in 0..self.num_workers {
            workers.spawn(worker(
                cancel.clone(),
                Arc::clone(&work_rx),
                results_tx.clone(),
                Arc::clone(&self.fetcher),
                Arc::clone(&self.parser),
            ));
        }
        // The coordinator keeps no results sender of its own: the channel
        // closes when the last worker exits and drops its clone.
        drop(results_tx);

        // Held in an Option so dropping it is the close-work-channel signal.
        let mut work_tx = Some(work_tx);

        let seeded = match work_tx.as_ref() {
            Some(tx) => {
                let item = WorkItem {
                    url: self.start_url.to_string(),
                };
                tokio::select! {
                    _ = cancel.cancelled() => false,
                    sent = tx.send(item) => sent.is_ok(),
                }
            }
            None => false,
        };

        if !seeded {
            self.outstanding -= 1;
            work_tx.take();
            while workers.join_next().await.is_some() {}
            return Err(CrawlError::Cancelled);
        }

        while let Some(result) = results_rx.recv().await {
            self.process_result(cancel, result, &mut work_tx).await;
        }

        while workers.join_next().await.is_some() {}

        let stats = CrawlStats {
            pages_visited: self.visit_count,
            errors: self.error_count,
            duration: started.elapsed(),
        };
        output::log_summary(&stats);

        Ok(stats)
    }

    /// Handles one result from a worker. This is where the termination
    /// invariant is enforced: exactly one counter decrement per result, after
    /// every enqueue derived from it.
    async fn process_result(
        &mut self,
        cancel: &CancellationToken,
        result: PageResult,
        work_tx: &mut Option<mpsc::Sender<WorkItem>>,
    ) {
        let final_key = canonical_key(&result.final_url);
        let redirected = result.url != result.final_url;

        // If a redirect landed on a page already printed via a direct link,
        // printing it again would duplicate output.
        let already_printed = redirected && self.visited.contains(&final_key);
        if !already_printed {
            self.print_result(&result);
        }

        // Marking the redirect target visited stops a later direct link to
        // it from being fetched a second time.
        if redirected {
            self.visited.insert(final_key);
        }

        if let Some(err) = &result.err {
            tracing::error!(
                "Failed to fetch {}: {} [{}]",
                result.url,
                err,
                err.category().as_str()
            );
            self.error_count += 1;
            self.complete_item(work_tx);
            return;
        }

        if cancel.is_cancelled() {
            self.complete_item(work_tx);
            return;
        }

        // Links resolve against the page's actual location after redirects,
        // not the URL that was requested.
        let links = self.sanitize_links(result.links.as_deref().unwrap_or(&[]), &result.final_url);

        for link in links {
            if cancel.is_cancelled() {
                self.complete_item(work_tx);
                return;
            }

            if !in_scope(&link, &self.start_host) {
                continue;
            }

            let link_key = canonical_key(&link);
            if self.visited.contains(&link_key) {
                continue;
            }

            if self.max_pages > 0 && self.visit_count >= self.max_pages {
                continue;
            }

            self.visited.insert(link_key);
            self.visit_count += 1;

            // Counter up BEFORE the enqueue: the crawl must not be declared
            // finished while this item is still on its way to a worker.
            self.outstanding += 1;

            let enqueued = match work_tx.as_ref() {
                Some(tx) => tokio::select! {
                    _ = cancel.cancelled() => false,
                    sent = tx.send(WorkItem { url: link }) => sent.is_ok(),
                },
                None => false,
            };

            if !enqueued {
                // The item never reached the channel; take its increment back
                // and stop scheduling.
                self.outstanding -= 1;
                self.complete_item(work_tx);
                return;
            }
        }

        self.complete_item(work_tx);
    }

    /// Counter down AFTER all derived enqueues. At zero, dropping the work
    /// sender closes the channel; workers drain and exit, their result
    /// senders drop, and the results channel closes behind them.
    fn complete_item(&mut self, work_tx: &mut Option<mpsc::Sender<WorkItem>>) {
        self.outstanding -= 1;
        if self.outstanding == 0 {
            work_tx.take();
        }
    }

    /// Sanitizes raw hrefs against the page URL, keeping only http(s) links.
    fn sanitize_links(&self, raw_hrefs: &[String], page_url: &str) -> Vec<String> {
        let base = match Url::parse(page_url) {
            Ok(base) => base,
            // Unparseable page URLs cannot happen for pages we fetched, but
            // a worker result is still accounted for if one slips through.
            Err(_) => return Vec::new(),
        };

        raw_hrefs
            .iter()
            .filter_map(|href| sanitize(href, &base))
            .collect()
    }

    /// Prints one page in the configured format. All sanitized links are
    /// printed, including out-of-scope ones; only in-scope links are fetched.
    fn print_result(&mut self, result: &PageResult) {
        let links = match &result.err {
            None => self.sanitize_links(result.links.as_deref().unwrap_or(&[]), &result.final_url),
            Some(_) => Vec::new(),
        };

        let written = match self.format {
            OutputFormat::Text => output::write_text(&mut self.output, &result.final_url, &links),
            OutputFormat::Records => output::write_record(
                &mut self.output,
                &result.final_url,
                &links,
                result.err.as_ref().map(|e| e.to_string()),
            ),
        };

        if let Err(e) = written {
            tracing::error!("Failed to write output: {}", e);
        }
    }

    #[cfg(test)]
    pub(crate) fn outstanding(&self) -> usize {
        self.outstanding
    }
}
