//! API Routes
//!
//! Configures the Axum router with all dashboard cache endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    chart_handler, cleanup_handler, clear_handler, dashboard_stats_handler, health_handler,
    invalidate_dashboard_handler, invalidate_handler, metrics_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /cache/stats` - Cache statistics
/// - `DELETE /cache/keys/:key` - Invalidate one key
/// - `POST /cache/clear` - Clear the whole cache (and remote mirror)
/// - `POST /cache/cleanup` - Sweep expired entries
/// - `GET /dashboard/metrics` - Cached dashboard metrics
/// - `GET /dashboard/stats` - Cached dashboard statistics
/// - `GET /dashboard/charts/:chart_type` - Cached chart configuration
/// - `POST /dashboard/invalidate` - Drop all dashboard data
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/keys/:key", delete(invalidate_handler))
        .route("/cache/clear", post(clear_handler))
        .route("/cache/cleanup", post(cleanup_handler))
        .route("/dashboard/metrics", get(metrics_handler))
        .route("/dashboard/stats", get(dashboard_stats_handler))
        .route("/dashboard/charts/:chart_type", get(chart_handler))
        .route("/dashboard/invalidate", post(invalidate_dashboard_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
