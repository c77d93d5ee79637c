//! Stat Cache - A read-through attribute cache
//!
//! Caches file attribute lookups for configured path prefixes with a short
//! TTL and periodic background eviction.

pub mod api;
pub mod backing;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod runtime;
pub mod tasks;

pub use api::AppState;
pub use cache::AttrCache;
pub use config::Config;
pub use error::{CacheError, Result};
pub use runtime::CacheRuntime;
pub use tasks::EvictionSweeper;
