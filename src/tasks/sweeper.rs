//! Eviction Sweeper Task
//!
//! Background task that periodically removes expired attribute snapshots,
//! independent of read traffic.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::AttrCache;
use crate::error::{CacheError, Result};

// == Eviction Sweeper ==
/// Handle to the recurring eviction task.
///
/// Dropping the handle also stops the task, since the stop channel closes.
#[derive(Debug)]
pub struct EvictionSweeper {
    stop_tx: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl EvictionSweeper {
    /// Spawns the sweeper on the current tokio runtime.
    ///
    /// The first sweep runs one `interval` after spawning. The stop signal is
    /// only observed between sweeps, so a sweep in progress always finishes.
    ///
    /// # Errors
    /// `InitializationFailed` if called outside a tokio runtime.
    ///
    /// # Example
    /// ```ignore
    /// let cache = Arc::new(AttrCache::new(&config));
    /// let sweeper = EvictionSweeper::spawn(cache.clone(), config.sweep_interval())?;
    /// // Later, during shutdown:
    /// sweeper.stop().await;
    /// ```
    pub fn spawn<S>(cache: Arc<AttrCache<S>>, interval: Duration) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| {
            CacheError::InitializationFailed(format!("Eviction sweeper needs a tokio runtime: {}", e))
        })?;
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = runtime.spawn(async move {
            info!(interval_ms = interval.as_millis() as u64, "Starting eviction sweeper");

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = cache.evict_expired(Instant::now()).await;
                        if removed > 0 {
                            info!("Eviction sweep: removed {} expired entries", removed);
                        } else {
                            debug!("Eviction sweep: no expired entries found");
                        }
                    }
                    _ = stop_rx.changed() => break,
                }
            }

            info!("Eviction sweeper stopped");
        });

        Ok(Self {
            stop_tx,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Stops the sweeper and waits for it to exit. Safe to call repeatedly.
    pub async fn stop(&self) {
        // Fails only if the task already exited
        let _ = self.stop_tx.send(true);

        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Eviction sweeper exited abnormally");
            }
        }
    }

    /// Returns true once the task has exited.
    pub async fn is_stopped(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .map_or(true, JoinHandle::is_finished)
    }
}
