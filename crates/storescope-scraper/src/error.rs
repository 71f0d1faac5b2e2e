use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid website URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("content at {url} is not machine-readable markup")]
    UnsupportedContent { url: String },

    #[error("profile collection cancelled before completion")]
    Cancelled,

    #[error("failed to construct HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

impl ScrapeError {
    /// Classifies a transport-level `reqwest` failure for `url`.
    ///
    /// Timeouts (request or connect deadline) become [`ScrapeError::Timeout`];
    /// everything else at this layer is a connection-class failure.
    pub(crate) fn from_transport(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout {
                url: url.to_owned(),
            }
        } else {
            ScrapeError::Connection {
                url: url.to_owned(),
                reason: err.to_string(),
            }
        }
    }
}

/// Error observed by `ProfileCache::get_or_fetch` callers.
///
/// Scrape failures are `Arc`-shared so every single-flight waiter observes
/// the one in-flight operation's outcome without cloning the underlying
/// error chain.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("{0}")]
    Scrape(Arc<ScrapeError>),

    #[error("profile fetch cancelled before completion")]
    Cancelled,
}

impl CacheError {
    /// The underlying scrape error, when this is a scrape failure.
    #[must_use]
    pub fn as_scrape(&self) -> Option<&ScrapeError> {
        match self {
            CacheError::Scrape(err) => Some(err),
            CacheError::Cancelled => None,
        }
    }
}

impl From<ScrapeError> for CacheError {
    fn from(err: ScrapeError) -> Self {
        CacheError::Scrape(Arc::new(err))
    }
}
