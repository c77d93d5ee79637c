//! Attribute Store Module
//!
//! Expiring path→snapshot storage. The store itself is not synchronized; the
//! engine keeps it behind a single lock.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Attribute Store ==
/// Path-keyed snapshot storage with TTL-checked lookups.
#[derive(Debug)]
pub struct AttributeStore<S> {
    /// Entries keyed by canonical path
    entries: HashMap<String, CacheEntry<S>>,
    /// Maximum age of a servable entry
    ttl: Duration,
    /// Maximum key length in bytes
    max_path_len: usize,
}

impl<S: Clone> AttributeStore<S> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `ttl` - Maximum age of a servable entry
    /// * `max_path_len` - Maximum key length in bytes
    pub fn new(ttl: Duration, max_path_len: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_path_len,
        }
    }

    // == Lookup ==
    /// Returns the snapshot for `path` if it is younger than the TTL.
    ///
    /// Expired entries are left in place for the sweeper.
    pub fn lookup(&self, path: &str, now: Instant) -> Option<S> {
        self.entries
            .get(path)
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .map(|entry| entry.snapshot.clone())
    }

    // == Insert ==
    /// Stores `snapshot` for `path`, replacing any previous entry.
    ///
    /// # Errors
    /// - `InvalidInput` if `path` is longer than the configured maximum
    /// - `ResourceExhausted` if the map cannot grow
    pub fn insert(&mut self, path: String, snapshot: S, now: Instant) -> Result<()> {
        if path.len() > self.max_path_len {
            return Err(CacheError::InvalidInput(format!(
                "Path exceeds maximum length of {} bytes",
                self.max_path_len
            )));
        }

        if !self.entries.contains_key(&path) {
            self.entries
                .try_reserve(1)
                .map_err(|e| CacheError::ResourceExhausted(e.to_string()))?;
        }

        let entry = CacheEntry::new(path.clone(), snapshot, now);
        self.entries.insert(path, entry);
        Ok(())
    }

    // == Evict Expired ==
    /// Removes every entry whose age is at least the TTL.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        before - self.entries.len()
    }

    // == Drain ==
    /// Removes all entries, returning how many were dropped.
    pub fn drain(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Length ==
    /// Returns the number of physically present entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
