//! TTL profile cache with per-key single-flight loading.
//!
//! At most one `CacheEntry` exists per normalized site URL. A fresh entry is
//! served without touching the network; a miss or expired entry makes the
//! first caller the *leader*, which runs the loader in its own task while
//! concurrent callers for the same key subscribe to a per-key broadcast
//! channel and observe the leader's outcome — success or the same shared
//! failure. The map mutex is held only for slot bookkeeping, never across a
//! load, so unrelated URLs never serialize.
//!
//! Cancellation: dropping the leader's future drops the pending slot via a
//! guard, which closes the channel; waiters map the closed channel to
//! [`CacheError::Cancelled`] and the next caller restarts the load. Expiry
//! is lazy (checked on access); failures are never cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

use storescope_core::BrandProfile;

use crate::collect::ProfileLoader;
use crate::error::{CacheError, ScrapeError};
use crate::normalize::normalize_site_url;

type LoadResult = Result<Arc<BrandProfile>, Arc<ScrapeError>>;
type SlotMap = HashMap<String, Slot>;

enum Slot {
    Ready {
        profile: Arc<BrandProfile>,
        created_at: Instant,
    },
    Pending {
        tx: broadcast::Sender<LoadResult>,
    },
}

pub struct ProfileCache<L> {
    loader: L,
    ttl: Duration,
    slots: Mutex<SlotMap>,
}

enum Action {
    Hit(Arc<BrandProfile>),
    Wait(broadcast::Receiver<LoadResult>),
    Lead,
}

impl<L: ProfileLoader> ProfileCache<L> {
    pub fn new(loader: L, ttl: Duration) -> Self {
        Self {
            loader,
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached profile for `url`, loading it at most once per TTL
    /// window regardless of concurrency.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Scrape`] — the (single) underlying load failed; every
    ///   concurrent caller for the key receives the same shared error.
    /// - [`CacheError::Cancelled`] — the leading load was dropped before
    ///   completion.
    pub async fn get_or_fetch(&self, url: &str) -> Result<Arc<BrandProfile>, CacheError> {
        let key = normalize_site_url(url).map_err(CacheError::from)?;

        let action = {
            let mut slots = lock_slots(&self.slots);
            match slots.get(&key) {
                Some(Slot::Ready {
                    profile,
                    created_at,
                }) if created_at.elapsed() < self.ttl => Action::Hit(Arc::clone(profile)),
                Some(Slot::Pending { tx }) => Action::Wait(tx.subscribe()),
                _ => {
                    let (tx, _) = broadcast::channel(1);
                    slots.insert(key.clone(), Slot::Pending { tx });
                    Action::Lead
                }
            }
        };

        match action {
            Action::Hit(profile) => {
                tracing::debug!(key = %key, "profile cache hit");
                Ok(profile)
            }
            Action::Wait(mut rx) => {
                tracing::debug!(key = %key, "joining in-flight profile load");
                match rx.recv().await {
                    Ok(Ok(profile)) => Ok(profile),
                    Ok(Err(err)) => Err(CacheError::Scrape(err)),
                    // Sender dropped without publishing: the leader was cancelled.
                    Err(_) => Err(CacheError::Cancelled),
                }
            }
            Action::Lead => self.lead(&key).await,
        }
    }

    /// Number of fresh cached profiles (expired entries excluded).
    #[must_use]
    pub fn cached_profile_count(&self) -> usize {
        let slots = lock_slots(&self.slots);
        slots
            .values()
            .filter(|slot| {
                matches!(slot, Slot::Ready { created_at, .. } if created_at.elapsed() < self.ttl)
            })
            .count()
    }

    /// Drops every cached entry. In-flight loads are unaffected.
    pub fn clear(&self) {
        let mut slots = lock_slots(&self.slots);
        slots.retain(|_, slot| matches!(slot, Slot::Pending { .. }));
    }

    async fn lead(&self, key: &str) -> Result<Arc<BrandProfile>, CacheError> {
        tracing::debug!(key = %key, "leading profile load");
        let guard = PendingGuard {
            slots: &self.slots,
            key,
            armed: true,
        };

        let result: LoadResult = match self.loader.load(key).await {
            Ok(profile) => Ok(Arc::new(profile)),
            Err(err) => Err(Arc::new(err)),
        };

        guard.complete(result.clone());
        result.map_err(CacheError::Scrape)
    }
}

fn lock_slots<'a>(slots: &'a Mutex<SlotMap>) -> MutexGuard<'a, SlotMap> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the pending slot if the leader never completes (cancellation), and
/// publishes the outcome to waiters when it does.
struct PendingGuard<'a> {
    slots: &'a Mutex<SlotMap>,
    key: &'a str,
    armed: bool,
}

impl PendingGuard<'_> {
    fn complete(mut self, result: LoadResult) {
        let tx = {
            let mut slots = lock_slots(self.slots);
            let pending = slots.remove(self.key);
            if let Ok(profile) = &result {
                slots.insert(
                    self.key.to_owned(),
                    Slot::Ready {
                        profile: Arc::clone(profile),
                        created_at: Instant::now(),
                    },
                );
            }
            match pending {
                Some(Slot::Pending { tx }) => Some(tx),
                _ => None,
            }
        };
        self.armed = false;

        if let Some(tx) = tx {
            // No receivers is fine: nobody joined this flight.
            let _ = tx.send(result);
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slots = lock_slots(self.slots);
        if matches!(slots.get(self.key), Some(Slot::Pending { .. })) {
            slots.remove(self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    /// Loader double that counts invocations at call time.
    struct CountingLoader {
        calls: AtomicUsize,
        delay_ms: u64,
        fail_first: bool,
    }

    impl CountingLoader {
        fn new(delay_ms: u64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay_ms,
                fail_first: false,
            }
        }

        fn failing_first(delay_ms: u64) -> Self {
            Self {
                fail_first: true,
                ..Self::new(delay_ms)
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ProfileLoader for CountingLoader {
        fn load(
            &self,
            url: &str,
        ) -> impl std::future::Future<Output = Result<BrandProfile, ScrapeError>> + Send
        {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let url = url.to_owned();
            let delay_ms = self.delay_ms;
            let fail = self.fail_first && n == 0;
            async move {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                if fail {
                    Err(ScrapeError::HttpStatus { status: 500, url })
                } else {
                    Ok(BrandProfile::empty(url, Utc::now()))
                }
            }
        }
    }

    #[tokio::test]
    async fn repeated_calls_within_ttl_load_once() {
        let cache = ProfileCache::new(CountingLoader::new(0), Duration::from_secs(60));
        let first = cache.get_or_fetch("https://a.test").await.unwrap();
        let second = cache.get_or_fetch("https://a.test").await.unwrap();
        assert_eq!(first.website_url, second.website_url);
        assert_eq!(cache.loader.call_count(), 1);
        assert_eq!(cache.cached_profile_count(), 1);
    }

    #[tokio::test]
    async fn url_variants_share_one_normalized_entry() {
        let cache = ProfileCache::new(CountingLoader::new(0), Duration::from_secs(60));
        cache.get_or_fetch("https://a.test/").await.unwrap();
        cache.get_or_fetch("https://A.test?utm=x").await.unwrap();
        assert_eq!(cache.loader.call_count(), 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_fresh_load() {
        let cache = ProfileCache::new(CountingLoader::new(0), Duration::from_millis(20));
        cache.get_or_fetch("https://a.test").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.get_or_fetch("https://a.test").await.unwrap();
        assert_eq!(cache.loader.call_count(), 2);
    }

    #[tokio::test]
    async fn ten_concurrent_calls_collapse_to_single_load() {
        let cache = Arc::new(ProfileCache::new(
            CountingLoader::new(100),
            Duration::from_secs(60),
        ));

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get_or_fetch("https://a.test").await })
            })
            .collect();

        for task in tasks {
            let profile = task.await.expect("task panicked").expect("load failed");
            assert_eq!(profile.website_url, "https://a.test");
        }
        assert_eq!(cache.loader.call_count(), 1);
    }

    #[tokio::test]
    async fn distinct_urls_do_not_serialize() {
        let cache = Arc::new(ProfileCache::new(
            CountingLoader::new(50),
            Duration::from_secs(60),
        ));
        let a = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_or_fetch("https://a.test").await })
        };
        let b = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_or_fetch("https://b.test").await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert_eq!(cache.loader.call_count(), 2);
        assert_eq!(cache.cached_profile_count(), 2);
    }

    #[tokio::test]
    async fn failure_is_shared_with_waiters_and_not_cached() {
        let cache = Arc::new(ProfileCache::new(
            CountingLoader::failing_first(80),
            Duration::from_secs(60),
        ));

        let leader = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_or_fetch("https://a.test").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let waiter = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_or_fetch("https://a.test").await })
        };

        let leader_err = leader.await.unwrap().unwrap_err();
        let waiter_err = waiter.await.unwrap().unwrap_err();
        for err in [&leader_err, &waiter_err] {
            assert!(
                matches!(
                    err.as_scrape(),
                    Some(ScrapeError::HttpStatus { status: 500, .. })
                ),
                "expected shared 500, got: {err:?}"
            );
        }
        assert_eq!(cache.loader.call_count(), 1);
        assert_eq!(cache.cached_profile_count(), 0);

        // Failures are not cached: the next call loads again and succeeds.
        let profile = cache.get_or_fetch("https://a.test").await.unwrap();
        assert_eq!(profile.website_url, "https://a.test");
        assert_eq!(cache.loader.call_count(), 2);
    }

    #[tokio::test]
    async fn cancelled_leader_releases_waiters() {
        let cache = Arc::new(ProfileCache::new(
            CountingLoader::new(30_000),
            Duration::from_secs(60),
        ));

        let leader = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_or_fetch("https://a.test").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let waiter = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_or_fetch("https://a.test").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        leader.abort();
        let result = waiter.await.expect("waiter panicked");
        assert!(
            matches!(result, Err(CacheError::Cancelled)),
            "expected Cancelled, got: {result:?}"
        );

        // The pending slot was cleared: a later caller becomes a new leader.
        assert_eq!(cache.cached_profile_count(), 0);
    }

    #[tokio::test]
    async fn invalid_url_rejected_without_loading() {
        let cache = ProfileCache::new(CountingLoader::new(0), Duration::from_secs(60));
        let err = cache.get_or_fetch("not-a-url").await.unwrap_err();
        assert!(
            matches!(err.as_scrape(), Some(ScrapeError::InvalidUrl { .. })),
            "expected InvalidUrl, got: {err:?}"
        );
        assert_eq!(cache.loader.call_count(), 0);
    }

    #[tokio::test]
    async fn clear_evicts_ready_entries() {
        let cache = ProfileCache::new(CountingLoader::new(0), Duration::from_secs(60));
        cache.get_or_fetch("https://a.test").await.unwrap();
        assert_eq!(cache.cached_profile_count(), 1);
        cache.clear();
        assert_eq!(cache.cached_profile_count(), 0);
        cache.get_or_fetch("https://a.test").await.unwrap();
        assert_eq!(cache.loader.call_count(), 2);
    }
}
