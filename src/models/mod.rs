//! Models Module
//!
//! Request and response DTOs for the dashboard cache API.

mod requests;
mod responses;

pub use requests::DashboardQuery;
pub use responses::{CleanupResponse, HealthResponse, InvalidateResponse, MessageResponse};
