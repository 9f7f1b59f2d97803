use url::Url;

use super::CrawlConfig;
use crate::ConfigError;

/// Validates a crawl configuration before any work starts.
///
/// The same start-URL checks run again inside coordinator construction;
/// running them here lets the binary report flag problems before building
/// an HTTP client.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.workers == 0 {
        return Err(ConfigError::NoWorkers);
    }

    let parsed = Url::parse(&config.start_url)
        .map_err(|e| ConfigError::InvalidStartUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
