//! API Handlers
//!
//! HTTP request handlers for the dashboard data and cache administration endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheManager, StatsSnapshot};
use crate::config::Config;
use crate::dashboard::{ChartConfig, DashboardCache, InMemoryMetricsSource, MetricsSource};
use crate::error::{CacheError, Result};
use crate::models::{
    CleanupResponse, DashboardQuery, HealthResponse, InvalidateResponse, MessageResponse,
};

/// Application state shared across all handlers.
///
/// This is the process's composition root: one cache manager, injected into
/// the dashboard caches and every handler.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide cache manager
    pub cache: Arc<CacheManager>,
    /// Memoized dashboard data over the same manager
    pub dashboard: Arc<DashboardCache>,
}

impl AppState {
    /// Creates a new AppState around an existing manager and data source.
    pub fn new(cache: Arc<CacheManager>, source: Arc<dyn MetricsSource>) -> Self {
        let dashboard = Arc::new(DashboardCache::new(cache.clone(), source));
        Self { cache, dashboard }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Connects the remote mirror when `REDIS_URL` is set and reachable, and
    /// serves metrics from an in-memory source.
    pub fn from_config(config: &Config) -> Self {
        let cache = Arc::new(CacheManager::from_config(config));
        Self::new(cache, Arc::new(InMemoryMetricsSource::new()))
    }
}

/// Runs cache work that may block on the remote mirror off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| CacheError::Internal(err.to_string()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.remote_connected()))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.cache.get_stats())
}

/// Handler for DELETE /cache/keys/:key
///
/// Invalidating a key that is not cached still succeeds.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    if key.trim().is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }

    let cache = state.cache.clone();
    let target = key.clone();
    run_blocking(move || cache.invalidate(&target)).await?;

    Ok(Json(InvalidateResponse::new(key)))
}

/// Handler for POST /cache/clear
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    let cache = state.cache.clone();
    run_blocking(move || cache.clear()).await?;

    Ok(Json(MessageResponse::new("Cache cleared")))
}

/// Handler for POST /cache/cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    Json(CleanupResponse {
        removed: state.cache.cleanup_expired(),
    })
}

/// Handler for GET /dashboard/metrics
pub async fn metrics_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Value>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let dashboard = state.dashboard.clone();
    let metrics = run_blocking(move || dashboard.metrics(&query.period, query.user_id)).await??;

    Ok(Json(metrics))
}

/// Handler for GET /dashboard/stats
pub async fn dashboard_stats_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Value>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let dashboard = state.dashboard.clone();
    let stats = run_blocking(move || dashboard.stats(&query.period, query.user_id)).await??;

    Ok(Json(stats))
}

/// Handler for GET /dashboard/charts/:chart_type
///
/// Unknown chart types get the default configuration.
pub async fn chart_handler(
    State(state): State<AppState>,
    Path(chart_type): Path<String>,
) -> Result<Json<ChartConfig>> {
    let dashboard = state.dashboard.clone();
    let config = run_blocking(move || dashboard.chart_config(&chart_type)).await?;

    Ok(Json(config))
}

/// Handler for POST /dashboard/invalidate
///
/// Drops all dashboard data. The underlying clear is global.
pub async fn invalidate_dashboard_handler(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>> {
    let dashboard = state.dashboard.clone();
    run_blocking(move || dashboard.invalidate_all()).await?;

    Ok(Json(MessageResponse::new("Dashboard cache invalidated")))
}
