//! HTTP page fetcher for storefront content.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScrapeError;
use crate::retry::retry_with_backoff;

/// Fetches raw page content for a target URL.
///
/// Applies a bounded per-request timeout and automatic retry with exponential
/// backoff for transient failures (timeouts, connection errors, 5xx). 4xx
/// responses fail immediately as typed errors. The fetcher holds no state
/// beyond the shared `reqwest::Client` and never mutates anything outside the
/// network call.
pub struct PageFetcher {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in milliseconds for exponential backoff: `base * 2^attempt`.
    backoff_base_ms: u64,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first failure for
    /// retriable errors. Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches the body of `url` as text, with automatic retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Timeout`] — request deadline elapsed after all retries.
    /// - [`ScrapeError::Connection`] — network failure after all retries.
    /// - [`ScrapeError::HttpStatus`] — non-2xx status (5xx retried, 4xx not).
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.to_owned();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .send()
                    .await
                    .map_err(|e| ScrapeError::from_transport(&url, &e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ScrapeError::HttpStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                response
                    .text()
                    .await
                    .map_err(|e| ScrapeError::from_transport(&url, &e))
            }
        })
        .await
    }
}
