//! Dash Cache - In-process cache for the AI monitoring dashboard
//!
//! Provides a bounded LRU cache with TTL expiration, an optional Redis
//! mirror, hit/miss accounting and memoized dashboard data functions.

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{cached, CacheManager};
pub use config::Config;
pub use dashboard::DashboardCache;
pub use error::{CacheError, Result};
pub use tasks::{spawn_cleanup_task, spawn_warmup_task};
