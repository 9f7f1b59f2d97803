//! HTTP fetcher implementation
//!
//! One shared `reqwest::Client` serves all workers: user agent, total
//! request timeout, and transparent redirect following are configured once
//! at construction. An optional global rate gate spaces requests across the
//! whole pool, and response bodies are capped at a configured maximum with
//! the overflow discarded silently.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::{Fetched, Fetcher};
use crate::config::CrawlConfig;
use crate::PageError;

/// HTTP fetcher backed by a shared, thread-safe client.
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
    /// Shared tick source; every request across every worker waits for the
    /// next tick before going out. `None` means unlimited.
    rate_gate: Option<Mutex<Interval>>,
}

impl HttpFetcher {
    /// Builds the fetcher and its HTTP client from the crawl configuration.
    ///
    /// Must be called from within a tokio runtime when a rate limit is
    /// configured, since the tick source registers with the runtime's timer.
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        let rate_gate = config.rate.map(|period| {
            // First tick lands one full period out, so even the first
            // request is paced.
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Mutex::new(interval)
        });

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
            rate_gate,
        })
    }

    /// Reads the response body up to the configured cap. Bytes past the cap
    /// are drained and dropped rather than treated as an error.
    async fn read_body(
        &self,
        cancel: &CancellationToken,
        url: &str,
        mut response: reqwest::Response,
    ) -> Result<Vec<u8>, PageError> {
        let mut body: Vec<u8> = Vec::new();

        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(PageError::Cancelled { url: url.to_string() });
                }
                chunk = response.chunk() => {
                    chunk.map_err(|e| classify_transport_error(url, e))?
                }
            };

            let Some(chunk) = chunk else { break };

            if body.len() < self.max_body_bytes {
                let room = self.max_body_bytes - body.len();
                body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, cancel: &CancellationToken, url: &str) -> Result<Fetched, PageError> {
        if let Some(gate) = &self.rate_gate {
            let mut interval = gate.lock().await;
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(PageError::Cancelled { url: url.to_string() });
                }
                _ = interval.tick() => {}
            }
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(PageError::Cancelled { url: url.to_string() });
            }
            sent = self.client.get(url).send() => {
                sent.map_err(|e| classify_transport_error(url, e))?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Redirects were followed by the client; this is where the page
        // actually lives, and what links will resolve against.
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = self.read_body(cancel, url, response).await?;

        Ok(Fetched {
            body,
            final_url,
            content_type,
        })
    }
}

fn classify_transport_error(url: &str, err: reqwest::Error) -> PageError {
    if let Some(status) = err.status() {
        return PageError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        };
    }

    PageError::Network {
        url: url.to_string(),
        message: err.to_string(),
    }
}
