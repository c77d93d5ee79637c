//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default prefix whose attributes are cached.
pub const DEFAULT_CACHED_PREFIX: &str = "/tmp/nfs";

/// Cache configuration parameters.
///
/// Fixed for the lifetime of the process; there is no reload.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum age of a cached snapshot, in milliseconds
    pub ttl_ms: u64,
    /// Interval between background eviction sweeps, in milliseconds
    pub sweep_interval_ms: u64,
    /// Maximum canonical path length in bytes that can be cached
    pub max_path_len: usize,
    /// Path prefixes eligible for caching, in configured order
    pub cached_prefixes: Vec<String>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Snapshot TTL in milliseconds (default: 1000)
    /// - `SWEEP_INTERVAL_MS` - Sweep interval in milliseconds (default: 5000)
    /// - `MAX_PATH_LEN` - Maximum cacheable path length (default: 256)
    /// - `CACHED_PREFIXES` - Comma-separated prefixes (default: `/tmp/nfs`)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            ttl_ms: parse_var("CACHE_TTL_MS").unwrap_or(defaults.ttl_ms),
            sweep_interval_ms: parse_var("SWEEP_INTERVAL_MS")
                .unwrap_or(defaults.sweep_interval_ms),
            max_path_len: parse_var("MAX_PATH_LEN").unwrap_or(defaults.max_path_len),
            cached_prefixes: env::var("CACHED_PREFIXES")
                .ok()
                .map(|v| parse_prefixes(&v))
                .unwrap_or(defaults.cached_prefixes),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Checks that the configuration can back a running cache.
    pub fn validate(&self) -> Result<()> {
        if self.ttl_ms == 0 {
            return Err(CacheError::InitializationFailed(
                "TTL must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval_ms == 0 {
            return Err(CacheError::InitializationFailed(
                "Sweep interval must be greater than zero".to_string(),
            ));
        }
        if self.max_path_len == 0 {
            return Err(CacheError::InitializationFailed(
                "Maximum path length must be greater than zero".to_string(),
            ));
        }
        if self.cached_prefixes.iter().any(|p| p.is_empty()) {
            return Err(CacheError::InitializationFailed(
                "Cached prefixes cannot be empty strings".to_string(),
            ));
        }
        Ok(())
    }

    /// Snapshot TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_ms: 1000,
            sweep_interval_ms: 5000,
            max_path_len: 256,
            cached_prefixes: vec![DEFAULT_CACHED_PREFIX.to_string()],
            server_port: 3000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Splits a comma-separated prefix list, dropping blank items.
fn parse_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
