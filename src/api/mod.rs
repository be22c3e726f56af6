//! API Module
//!
//! HTTP handlers and routing for the dashboard cache.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /cache/stats` - Cache statistics
//! - `DELETE /cache/keys/:key` - Invalidate one key
//! - `POST /cache/clear` - Clear the whole cache
//! - `POST /cache/cleanup` - Sweep expired entries
//! - `GET /dashboard/metrics` - Cached dashboard metrics
//! - `GET /dashboard/stats` - Cached dashboard statistics
//! - `GET /dashboard/charts/:chart_type` - Cached chart configuration
//! - `POST /dashboard/invalidate` - Drop all dashboard data

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
