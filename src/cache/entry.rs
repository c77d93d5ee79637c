//! Cache Entry Module
//!
//! Defines a single cached attribute snapshot and its age checks.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A cached attribute snapshot for one canonical path.
///
/// Entries are never mutated after insertion; a refetch replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<S> {
    /// Canonical path this snapshot belongs to
    pub path: String,
    /// Snapshot returned by the backing lookup
    pub snapshot: S,
    /// Monotonic insertion time
    pub inserted_at: Instant,
}

impl<S> CacheEntry<S> {
    // == Constructor ==
    /// Creates a new entry stamped with `now`.
    pub fn new(path: String, snapshot: S, now: Instant) -> Self {
        Self {
            path,
            snapshot,
            inserted_at: now,
        }
    }

    // == Age ==
    /// Time elapsed since insertion, saturating at zero if `now` is earlier.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry whose age equals the TTL is expired, so a
    /// served snapshot is always strictly younger than the TTL.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }
}
