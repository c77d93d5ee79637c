//! API Module
//!
//! HTTP host for the attribute cache: routes attribute lookups through the
//! cache with the local filesystem as the backing lookup.
//!
//! # Endpoints
//! - `GET /attr/*path` - Attributes for an absolute path
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
