//! Retry utilities for the storefront fetcher.
//!
//! Provides exponential backoff retry logic for transient HTTP errors such as
//! timeouts and 5xx responses. Non-retriable errors (4xx statuses, invalid
//! URLs, unparseable content) are propagated immediately without retrying.

use std::future::Future;
use std::time::Duration;

use crate::error::ScrapeError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ScrapeError::Timeout`] — the request deadline elapsed.
/// - [`ScrapeError::Connection`] — network-level failure (reset, DNS, TLS).
/// - [`ScrapeError::HttpStatus`] with a 5xx status — server-side trouble.
///
/// Non-retriable errors (propagated immediately):
/// - [`ScrapeError::HttpStatus`] with a 4xx status — retrying returns the same result.
/// - [`ScrapeError::InvalidUrl`] — the target is malformed; never retried.
/// - [`ScrapeError::UnsupportedContent`] — the body does not parse; retrying won't fix it.
/// - [`ScrapeError::Cancelled`] / [`ScrapeError::ClientBuild`] — not fetch outcomes.
fn is_retriable(err: &ScrapeError) -> bool {
    match err {
        ScrapeError::Timeout { .. } | ScrapeError::Connection { .. } => true,
        ScrapeError::HttpStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On success the result is returned immediately.
///
/// On a retriable error the function sleeps for `backoff_base_ms * 2^attempt`
/// milliseconds and tries again, up to `max_retries` additional attempts after
/// the first try. If all retries are exhausted the last error is returned.
///
/// Non-retriable errors are returned immediately without sleeping or retrying.
///
/// # Backoff schedule (example with `backoff_base_ms = 500`)
///
/// | Attempt | Sleep before next attempt |
/// |---------|--------------------------|
/// | 0 (initial) | — (no sleep before first try) |
/// | 1 (first retry) | 500 × 2^0 = 500 ms |
/// | 2 (second retry) | 500 × 2^1 = 1000 ms |
/// | 3 (third retry) | 500 × 2^2 = 2000 ms |
///
/// With `max_retries = 3` the operation is attempted at most 4 times total.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Exponential backoff: base * 2^attempt milliseconds.
        // Shift capped to prevent overflow on extreme configs.
        let delay_ms = backoff_base_ms.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            error = %last_err,
            "transient fetch error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Helper: make a retriable timeout error.
    fn timeout() -> ScrapeError {
        ScrapeError::Timeout {
            url: "https://shop.test".to_owned(),
        }
    }

    fn http_status(status: u16) -> ScrapeError {
        ScrapeError::HttpStatus {
            status,
            url: "https://shop.test".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScrapeError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_timeout_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(timeout())
                } else {
                    Ok::<u32, ScrapeError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_on_server_error() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(1, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(http_status(503))
                } else {
                    Ok::<u32, ScrapeError>(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScrapeError>(timeout())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ScrapeError::Timeout { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_client_error_status() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScrapeError>(http_status(404))
            }
        })
        .await;
        // Should have tried exactly once — no retries for a 4xx.
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(ScrapeError::HttpStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_invalid_url() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScrapeError>(ScrapeError::InvalidUrl {
                    url: "not-a-url".to_owned(),
                    reason: "relative URL without a base".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScrapeError::InvalidUrl { .. })));
    }
}
