//! Cache Module
//!
//! Read-through attribute caching with TTL expiry and prefix-based eligibility.

mod engine;
mod entry;
mod matcher;
mod path;
mod stats;
mod store;


// Re-export public types
pub use engine::AttrCache;
pub use entry::CacheEntry;
pub use matcher::PathMatcher;
pub use path::canonicalize;
pub use stats::{CacheStats, StatsCounters};
pub use store::AttributeStore;
