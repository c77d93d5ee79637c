//! Attribute Cache Engine
//!
//! Read-through orchestration: eligibility check, TTL-checked lookup, backing
//! fallback and best-effort population.

use std::future::Future;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{canonicalize, AttributeStore, CacheStats, PathMatcher, StatsCounters};
use crate::config::Config;
use crate::error::Result;

// == Attr Cache ==
/// Read-through attribute cache shared by every caller and the sweeper.
///
/// The store sits behind one lock; the backing lookup always runs with no
/// guard held.
#[derive(Debug)]
pub struct AttrCache<S> {
    /// Snapshot storage
    store: RwLock<AttributeStore<S>>,
    /// Eligibility filter
    matcher: PathMatcher,
    /// Hit/miss/eviction counters, updated outside the lock
    stats: StatsCounters,
    /// Longest canonical path that may be cached
    max_path_len: usize,
}

impl<S> AttrCache<S>
where
    S: Clone + Send + Sync,
{
    // == Constructor ==
    /// Builds an empty cache from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            store: RwLock::new(AttributeStore::new(config.ttl(), config.max_path_len)),
            matcher: PathMatcher::new(config.cached_prefixes.clone()),
            stats: StatsCounters::new(),
            max_path_len: config.max_path_len,
        }
    }

    // == Get Attributes ==
    /// Returns attributes for `path`, consulting the cache when eligible.
    ///
    /// `backing` receives the canonical path. Its errors are returned
    /// unchanged, and a failure to cache a fetched snapshot never fails the
    /// call.
    ///
    /// # Errors
    /// - `InvalidInput` if `path` cannot be canonicalized
    /// - whatever `backing` returns
    pub async fn get_attributes<F, Fut>(&self, path: &str, backing: F) -> Result<S>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<S>>,
    {
        let path = canonicalize(path)?;

        if path.len() > self.max_path_len || !self.matcher.is_cacheable(&path) {
            return backing(path).await;
        }

        let now = Instant::now();
        let cached = self.store.read().await.lookup(&path, now);
        if let Some(snapshot) = cached {
            self.stats.record_hit();
            return Ok(snapshot);
        }

        self.stats.record_miss();
        let snapshot = backing(path.clone()).await?;

        let inserted = self
            .store
            .write()
            .await
            .insert(path.clone(), snapshot.clone(), now);
        match inserted {
            Ok(()) => debug!(path = %path, "Added cache entry"),
            Err(e) => warn!(path = %path, error = %e, "Skipped caching attributes"),
        }

        Ok(snapshot)
    }

    // == Evict Expired ==
    /// Removes entries older than the TTL and counts them as evictions.
    pub async fn evict_expired(&self, now: Instant) -> usize {
        let removed = self.store.write().await.evict_expired(now);
        self.stats.record_evictions(removed);
        removed
    }

    // == Drain ==
    /// Drops every entry. Used at shutdown.
    pub async fn drain(&self) -> usize {
        self.store.write().await.drain()
    }

    // == Stats ==
    /// Returns current counters and the physical store size.
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.store.read().await.len();
        self.stats.snapshot(total_entries)
    }

    /// Cumulative hits, readable without touching the store.
    pub fn hits(&self) -> u64 {
        self.stats.hits()
    }

    /// Cumulative misses, readable without touching the store.
    pub fn misses(&self) -> u64 {
        self.stats.misses()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[cfg(test)]
impl<S> AttrCache<S> {
    /// Builds a cache around a prepared store.
    fn with_store(config: &Config, store: AttributeStore<S>) -> Self {
        Self {
            store: RwLock::new(store),
            matcher: PathMatcher::new(config.cached_prefixes.clone()),
            stats: StatsCounters::new(),
            max_path_len: config.max_path_len,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use std::future::{ready, Ready};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn test_config() -> Config {
        Config {
            ttl_ms: 1000,
            sweep_interval_ms: 5000,
            max_path_len: 32,
            cached_prefixes: vec!["/data".to_string()],
            server_port: 0,
        }
    }

    /// Backing lookup that counts its calls and returns `value`.
    fn backing(calls: &AtomicUsize, value: u32) -> impl FnOnce(String) -> Ready<Result<u32>> + '_ {
        move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            ready(Ok(value))
        }
    }

    fn failing(calls: &AtomicUsize, error: CacheError) -> impl FnOnce(String) -> Ready<Result<u32>> + '_ {
        move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            ready(Err(error))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cold_read_through() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);

        let result = cache.get_attributes("/data/x", backing(&calls, 1)).await;

        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_after_insert() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);

        cache.get_attributes("/data/x", backing(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_millis(999)).await;
        let result = cache.get_attributes("/data/x", backing(&calls, 2)).await;

        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_forces_refetch() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);

        cache.get_attributes("/data/x", backing(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_millis(1000)).await;
        let result = cache.get_attributes("/data/x", backing(&calls, 2)).await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 0);
        // Refetch replaced the stale entry
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_ttl_1000ms() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);

        // t=0
        let a = cache.get_attributes("/data/x", backing(&calls, 1)).await;
        assert_eq!(a, Ok(1));
        assert_eq!((cache.hits(), cache.misses()), (0, 1));

        // t=500
        tokio::time::advance(Duration::from_millis(500)).await;
        let b = cache.get_attributes("/data/x", backing(&calls, 99)).await;
        assert_eq!(b, Ok(1));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));

        // t=1500
        tokio::time::advance(Duration::from_millis(1000)).await;
        let c = cache.get_attributes("/data/x", backing(&calls, 2)).await;
        assert_eq!(c, Ok(2));
        assert_eq!((cache.hits(), cache.misses()), (1, 2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_bypass_for_ineligible_path() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);

        assert_eq!(cache.get_attributes("/etc/hosts", backing(&calls, 1)).await, Ok(1));
        assert_eq!(cache.get_attributes("/etc/hosts", backing(&calls, 2)).await, Ok(2));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_bypass_passes_errors_verbatim() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);
        let error = CacheError::NotFound("/etc/missing".to_string());

        let result = cache
            .get_attributes("/etc/missing", failing(&calls, error.clone()))
            .await;

        assert_eq!(result, Err(error));
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
    }

    #[tokio::test]
    async fn test_backing_failure_on_eligible_path() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);
        let error = CacheError::BackingLookupFailed("timed out".to_string());

        let result = cache
            .get_attributes("/data/x", failing(&calls, error.clone()))
            .await;

        assert_eq!(result, Err(error));
        assert_eq!(cache.misses(), 1);
        assert!(cache.is_empty().await);

        // Nothing was cached, so the next call goes to the backing lookup again
        assert_eq!(cache.get_attributes("/data/x", backing(&calls, 3)).await, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_path_skips_everything() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);

        for bad in ["", "data/x", "/data/\0x"] {
            let result = cache.get_attributes(bad, backing(&calls, 1)).await;
            assert!(matches!(result, Err(CacheError::InvalidInput(_))));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
    }

    #[tokio::test]
    async fn test_overlong_path_bypasses_cache() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);
        let long_path = format!("/data/{}", "x".repeat(64));

        assert_eq!(cache.get_attributes(&long_path, backing(&calls, 1)).await, Ok(1));
        assert_eq!(cache.get_attributes(&long_path, backing(&calls, 1)).await, Ok(1));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_equivalent_spellings_share_an_entry() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);

        cache.get_attributes("/data/x", backing(&calls, 1)).await.unwrap();
        assert_eq!(cache.get_attributes("//data/./x", backing(&calls, 2)).await, Ok(1));
        assert_eq!(cache.get_attributes("/data/y/../x", backing(&calls, 3)).await, Ok(1));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.hits(), 2);
    }

    #[tokio::test]
    async fn test_backing_receives_canonical_path() {
        let cache: AttrCache<String> = AttrCache::new(&test_config());

        let seen = cache
            .get_attributes("/data//a/./b", |p| ready(Ok(p)))
            .await
            .unwrap();

        assert_eq!(seen, "/data/a/b");
    }

    #[tokio::test]
    async fn test_insert_failure_still_returns_snapshot() {
        let config = test_config();
        // Store rejects every key longer than 4 bytes
        let store = AttributeStore::new(config.ttl(), 4);
        let cache = AttrCache::with_store(&config, store);
        let calls = AtomicUsize::new(0);

        assert_eq!(cache.get_attributes("/data/x", backing(&calls, 7)).await, Ok(7));
        assert_eq!(cache.misses(), 1);
        assert!(cache.is_empty().await);

        // Nothing was stored, so the next call misses again
        assert_eq!(cache.get_attributes("/data/x", backing(&calls, 8)).await, Ok(8));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!((cache.hits(), cache.misses()), (0, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_and_drain() {
        let cache = AttrCache::new(&test_config());
        let calls = AtomicUsize::new(0);

        cache.get_attributes("/data/old", backing(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_millis(800)).await;
        cache.get_attributes("/data/new", backing(&calls, 2)).await.unwrap();
        tokio::time::advance(Duration::from_millis(400)).await;

        assert_eq!(cache.evict_expired(Instant::now()).await, 1);
        let stats = cache.stats().await;
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 1);

        assert_eq!(cache.drain().await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_slow_backing_does_not_block_store() {
        let cache = Arc::new(AttrCache::new(&test_config()));
        let calls = AtomicUsize::new(0);
        cache.get_attributes("/data/b", backing(&calls, 2)).await.unwrap();

        let gate = Arc::new(Notify::new());
        let slow = {
            let cache = Arc::clone(&cache);
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                cache
                    .get_attributes("/data/a", move |_| async move {
                        gate.notified().await;
                        Ok::<_, CacheError>(1u32)
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;

        let hit = tokio::time::timeout(
            Duration::from_millis(200),
            cache.get_attributes("/data/b", backing(&calls, 9)),
        )
        .await
        .expect("lookup blocked behind a slow backing call");
        assert_eq!(hit, Ok(2));

        let swept = tokio::time::timeout(
            Duration::from_millis(200),
            cache.evict_expired(Instant::now()),
        )
        .await
        .expect("sweep blocked behind a slow backing call");
        assert_eq!(swept, 0);

        gate.notify_one();
        assert_eq!(slow.await.unwrap(), Ok(1));
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers() {
        let cache = Arc::new(AttrCache::new(&test_config()));
        let paths = ["/data/a", "/data/b", "/data/c", "/etc/passwd"];

        let mut handles = Vec::new();
        for i in 0..200 {
            let cache = Arc::clone(&cache);
            let path = paths[i % paths.len()];
            handles.push(tokio::spawn(async move {
                cache
                    .get_attributes(path, |p| async move { Ok::<_, CacheError>(p.len() as u32) })
                    .await
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let path = paths[i % paths.len()];
            assert_eq!(handle.await.unwrap(), Ok(path.len() as u32));
        }

        let stats = cache.stats().await;
        // 150 eligible calls, 50 bypassed
        assert_eq!(stats.hits + stats.misses, 150);
        assert!(stats.misses >= 3);
        assert_eq!(stats.total_entries, 3);
    }
}
