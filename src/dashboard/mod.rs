//! Dashboard Module
//!
//! Cached dashboard data: metrics and statistics from a [`MetricsSource`],
//! and chart configuration from a static table.

mod charts;
mod source;
mod wrappers;

pub use charts::{chart_config_for, ChartConfig, CHART_TYPES, DEFAULT_CHART_TYPE};
pub use source::{InMemoryMetricsSource, MetricSample, MetricsSource, Period, SourceError};
pub use wrappers::{DashboardCache, PeriodArgs, CHART_TTL, METRICS_TTL, STATS_TTL};
