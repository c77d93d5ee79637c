//! Response models for the attribute cache API
//!
//! Defines the DTOs serialized into HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{AttrResponse, HealthResponse, StatsResponse};
