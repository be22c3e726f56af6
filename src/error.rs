//! Error types for the dashboard cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::dashboard::SourceError;

// == Cache Error Enum ==
/// Unified error type for the cache subsystem and its HTTP surface.
///
/// Remote and serialization failures are produced by the lower layers but are
/// logged and swallowed by the manager; they only surface from code that talks
/// to those layers directly.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The remote mirror could not be reached or rejected a command
    #[error("Remote mirror error: {0}")]
    Remote(String),

    /// A value or argument could not be converted to/from JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The wrapped data source failed
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Remote(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Source(_) | CacheError::Remote(_) => StatusCode::BAD_GATEWAY,
            CacheError::Serialization(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache subsystem.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_maps_to_bad_request() {
        let response = CacheError::InvalidRequest("empty key".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_source_error_maps_to_bad_gateway() {
        let err: CacheError = SourceError::Unavailable("db down".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_serde_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CacheError = parse_err.into();
        assert!(matches!(err, CacheError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error"));
    }
}
