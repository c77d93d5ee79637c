//! API Handlers
//!
//! HTTP request handlers for each attribute cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::backing::{stat_path, FileAttributes};
use crate::cache::{canonicalize, AttrCache};
use crate::error::Result;
use crate::models::{AttrResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared attribute cache
    pub cache: Arc<AttrCache<FileAttributes>>,
}

impl AppState {
    /// Creates a new AppState around a shared cache.
    pub fn new(cache: Arc<AttrCache<FileAttributes>>) -> Self {
        Self { cache }
    }
}

/// Handler for GET /attr/*path
///
/// Returns attributes for an absolute filesystem path, read through the cache.
pub async fn attr_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<AttrResponse>> {
    // The wildcard capture drops the leading slash
    let path = canonicalize(&format!("/{}", path))?;
    let attributes = state.cache.get_attributes(&path, stat_path).await?;

    Ok(Json(AttrResponse::new(path, attributes)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
