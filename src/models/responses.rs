//! Response DTOs for the attribute cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::backing::FileAttributes;
use crate::cache::CacheStats;

/// Response body for an attribute lookup (GET /attr/*path)
#[derive(Debug, Clone, Serialize)]
pub struct AttrResponse {
    /// The requested path
    pub path: String,
    /// Attributes served from the cache or the filesystem
    pub attributes: FileAttributes,
}

impl AttrResponse {
    /// Creates a new AttrResponse
    pub fn new(path: impl Into<String>, attributes: FileAttributes) -> Self {
        Self {
            path: path.into(),
            attributes,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries removed by the sweeper
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
