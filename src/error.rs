//! Error types for the attribute cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine and its host.
///
/// `NotFound` and `BackingLookupFailed` are only ever produced by a backing
/// lookup; the engine hands them back to the caller untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Path could not be canonicalized
    #[error("Invalid path: {0}")]
    InvalidInput(String),

    /// Backing lookup reported that the path does not exist
    #[error("Path not found: {0}")]
    NotFound(String),

    /// Backing lookup failed for any other reason
    #[error("Backing lookup failed: {0}")]
    BackingLookupFailed(String),

    /// Store could not retain an entry
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Engine, store or sweeper could not be brought up
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::BackingLookupFailed(_) => StatusCode::BAD_GATEWAY,
            CacheError::ResourceExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::InitializationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the attribute cache.
pub type Result<T> = std::result::Result<T, CacheError>;
