//! Request DTOs for the dashboard cache API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

fn default_period() -> String {
    "24h".to_string()
}

fn default_user_id() -> i64 {
    1
}

/// Query string of the dashboard data endpoints
/// (`GET /dashboard/metrics`, `GET /dashboard/stats`)
///
/// # Fields
/// - `period`: `24h`, `7d`, `30d` or `all` (default `24h`)
/// - `user_id`: the dashboard owner (default 1)
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardQuery {
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

impl DashboardQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.period.trim().is_empty() {
            return Some("Period cannot be empty".to_string());
        }
        if self.user_id < 1 {
            return Some("user_id must be positive".to_string());
        }
        None
    }
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            period: default_period(),
            user_id: default_user_id(),
        }
    }
}
