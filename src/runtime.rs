//! Cache Runtime
//!
//! Owns the cache engine and its sweeper for the lifetime of the process:
//! ordered startup, then ordered and repeatable shutdown.

use std::sync::Arc;

use tracing::info;

use crate::cache::{AttrCache, CacheStats};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::EvictionSweeper;

/// A running attribute cache with its background sweeper.
#[derive(Debug)]
pub struct CacheRuntime<S> {
    cache: Arc<AttrCache<S>>,
    sweeper: EvictionSweeper,
}

impl<S> CacheRuntime<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Validates `config`, builds the engine and arms the sweeper.
    ///
    /// Must be called from within a tokio runtime. On error nothing is left
    /// running.
    ///
    /// # Errors
    /// `InitializationFailed` for an invalid config or a missing runtime.
    pub fn start(config: &Config) -> Result<Self> {
        config.validate()?;

        let cache = Arc::new(AttrCache::new(config));
        let sweeper = EvictionSweeper::spawn(Arc::clone(&cache), config.sweep_interval())?;

        info!(
            "Attribute cache started: ttl={}ms, sweep_interval={}ms, max_path_len={}, prefixes={:?}",
            config.ttl_ms, config.sweep_interval_ms, config.max_path_len, config.cached_prefixes
        );

        Ok(Self { cache, sweeper })
    }

    /// Shared handle for hosts that route lookups into the cache.
    pub fn cache(&self) -> Arc<AttrCache<S>> {
        Arc::clone(&self.cache)
    }

    /// Stops the sweeper, waits for any running sweep, then drains the store.
    ///
    /// Hosts must stop routing lookups here first. Calling this more than
    /// once is harmless. Returns the final counters.
    pub async fn shutdown(&self) -> CacheStats {
        self.sweeper.stop().await;
        let drained = self.cache.drain().await;
        let stats = self.cache.stats().await;

        info!(
            "Attribute cache shut down (hits: {}, misses: {}, drained: {})",
            stats.hits, stats.misses, drained
        );
        stats
    }
}
