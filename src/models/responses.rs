//! Response DTOs for the dashboard cache API
//!
//! Defines the structure of outgoing HTTP response bodies. Cache statistics
//! are returned as [`StatsSnapshot`](crate::cache::StatsSnapshot) directly.

use serde::Serialize;

/// Response body for key invalidation (DELETE /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Success message
    pub message: String,
    /// The key that was invalidated
    pub key: String,
}

impl InvalidateResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' invalidated", key),
            key,
        }
    }
}

/// Response body for bulk operations (POST /cache/clear, POST /dashboard/invalidate)
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the expiry sweep (POST /cache/cleanup)
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Number of expired entries removed
    pub removed: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether the remote mirror is in use
    pub remote_connected: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(remote_connected: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            remote_connected,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
