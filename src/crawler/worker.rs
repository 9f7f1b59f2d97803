//! Stateless fetch-and-parse workers
//!
//! A worker is a loop over the shared work channel. For each work item it
//! emits exactly one [`PageResult`] on the results channel, even if the
//! fetcher or parser panics. Workers never touch the visited set, the
//! outstanding-work counter, or the output stream; those belong to the
//! coordinator alone.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use super::{Fetcher, PageResult, Parser, WorkItem};
use crate::PageError;

/// Runs one worker until the work channel closes or cancellation fires.
///
/// Cancellation is only checked between items: work already pulled is always
/// carried through to a result so the coordinator can account for it.
pub(crate) async fn worker(
    cancel: CancellationToken,
    work_rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    results_tx: mpsc::Sender<PageResult>,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn Parser>,
) {
    loop {
        let item = {
            let mut rx = work_rx.lock().await;
            tokio::select! {
                _ = cancel.cancelled() => None,
                item = rx.recv() => item,
            }
        };

        let Some(item) = item else { return };

        let result =
            process_guarded(&cancel, item, Arc::clone(&fetcher), Arc::clone(&parser)).await;

        if results_tx.send(result).await.is_err() {
            // Coordinator is gone; nothing left to report to.
            return;
        }
    }
}

/// Processes one item inside a panic guard.
///
/// The fetch and parse run in their own task; if that task panics, the panic
/// is converted into an error result instead of stranding the coordinator's
/// counter.
async fn process_guarded(
    cancel: &CancellationToken,
    item: WorkItem,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn Parser>,
) -> PageResult {
    let url = item.url.clone();
    let cancel = cancel.clone();

    let task = tokio::spawn(async move {
        process_work_item(&cancel, item, fetcher.as_ref(), parser.as_ref()).await
    });

    match task.await {
        Ok(result) => result,
        Err(join_err) => {
            let message = if join_err.is_panic() {
                describe_panic(join_err.into_panic())
            } else {
                join_err.to_string()
            };
            PageResult {
                url: url.clone(),
                final_url: url,
                links: None,
                err: Some(PageError::WorkerAbort { message }),
            }
        }
    }
}

/// Fetches and parses a single work item. Always returns a result.
pub(crate) async fn process_work_item(
    cancel: &CancellationToken,
    item: WorkItem,
    fetcher: &dyn Fetcher,
    parser: &dyn Parser,
) -> PageResult {
    let fetched = match fetcher.fetch(cancel, &item.url).await {
        Ok(fetched) => fetched,
        Err(err) => {
            // The requested URL stands in for the final one; the fetch never
            // got far enough to learn where redirects would have landed.
            return PageResult {
                final_url: item.url.clone(),
                url: item.url,
                links: None,
                err: Some(err),
            };
        }
    };

    if !is_html(&fetched.content_type) {
        // Non-HTML content is a valid page with no extractable links.
        return PageResult {
            url: item.url,
            final_url: fetched.final_url,
            links: Some(Vec::new()),
            err: None,
        };
    }

    match parser.extract_links(&fetched.body) {
        Ok(links) => PageResult {
            url: item.url,
            final_url: fetched.final_url,
            links: Some(links),
            err: None,
        },
        Err(err) => PageResult {
            final_url: fetched.final_url,
            err: Some(PageError::Parse {
                url: item.url.clone(),
                message: err.to_string(),
            }),
            url: item.url,
            links: None,
        },
    }
}

/// Returns true if the Content-Type header indicates HTML.
///
/// The media type is the first `;`-separated token, trimmed and lowercased,
/// so `text/html; charset=utf-8` qualifies. An empty header is assumed HTML.
pub(crate) fn is_html(content_type: &str) -> bool {
    if content_type.is_empty() {
        return true;
    }

    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    media_type == "text/html"
}

fn describe_panic(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
