//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the cache.
//!
//! # Tasks
//! - Eviction Sweeper: Removes expired attribute snapshots at a fixed interval

mod sweeper;

pub use sweeper::EvictionSweeper;
