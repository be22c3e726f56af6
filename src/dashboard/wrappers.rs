//! Dashboard Caches
//!
//! The three memoized data functions the dashboard reads through.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::cache::{cached, CacheManager, Memoized};
use crate::dashboard::{chart_config_for, ChartConfig, MetricsSource, SourceError, CHART_TYPES};

/// TTL of dashboard metrics, in seconds.
pub const METRICS_TTL: u64 = 300;
/// TTL of dashboard statistics, in seconds.
pub const STATS_TTL: u64 = 600;
/// TTL of chart configurations, in seconds.
pub const CHART_TTL: u64 = 60;

/// Arguments of the period-based data functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodArgs {
    pub period: String,
    pub user_id: i64,
}

impl PeriodArgs {
    pub fn new(period: impl Into<String>, user_id: i64) -> Self {
        Self {
            period: period.into(),
            user_id,
        }
    }
}

type SourceFn = Box<dyn Fn(&PeriodArgs) -> Result<Value, SourceError> + Send + Sync>;
type ChartFn = fn(&String) -> ChartConfig;

// == Dashboard Cache ==
/// Memoized dashboard metrics, statistics and chart configuration.
pub struct DashboardCache {
    manager: Arc<CacheManager>,
    metrics: Memoized<PeriodArgs, Result<Value, SourceError>, SourceFn>,
    stats: Memoized<PeriodArgs, Result<Value, SourceError>, SourceFn>,
    charts: Memoized<String, ChartConfig, ChartFn>,
}

impl DashboardCache {
    pub fn new(manager: Arc<CacheManager>, source: Arc<dyn MetricsSource>) -> Self {
        let metrics_source = source.clone();
        let fetch_metrics: SourceFn = Box::new(move |args: &PeriodArgs| {
            info!("Fetching metrics (not cached): {}", args.period);
            metrics_source.fetch_metrics(&args.period, args.user_id)
        });

        let fetch_stats: SourceFn = Box::new(move |args: &PeriodArgs| {
            info!("Computing statistics (not cached): {}", args.period);
            source.metric_stats(&args.period, args.user_id)
        });

        Self {
            metrics: cached(manager.clone(), "get_dashboard_metrics", Some(METRICS_TTL), fetch_metrics),
            stats: cached(manager.clone(), "get_dashboard_stats", Some(STATS_TTL), fetch_stats),
            charts: cached(manager.clone(), "get_chart_config", Some(CHART_TTL), lookup_chart as ChartFn),
            manager,
        }
    }

    /// Dashboard metrics for a period, cached for five minutes.
    pub fn metrics(&self, period: &str, user_id: i64) -> Result<Value, SourceError> {
        self.metrics.try_call(&PeriodArgs::new(period, user_id))
    }

    /// Dashboard statistics for a period, cached for ten minutes.
    pub fn stats(&self, period: &str, user_id: i64) -> Result<Value, SourceError> {
        self.stats.try_call(&PeriodArgs::new(period, user_id))
    }

    /// Chart configuration, cached for one minute.
    pub fn chart_config(&self, chart_type: &str) -> ChartConfig {
        self.charts.call(&chart_type.to_string())
    }

    pub fn invalidate_metrics(&self, period: &str, user_id: i64) {
        self.metrics.invalidate(&PeriodArgs::new(period, user_id));
    }

    pub fn invalidate_stats(&self, period: &str, user_id: i64) {
        self.stats.invalidate(&PeriodArgs::new(period, user_id));
    }

    /// Drops every dashboard entry. This clears the whole manager.
    pub fn invalidate_all(&self) {
        info!("Invalidating dashboard cache...");
        self.charts.clear_all();
        info!("Dashboard cache invalidated");
    }

    /// Pre-populates metrics, statistics and every chart configuration.
    pub fn warm(&self, period: &str, user_id: i64) -> Result<(), SourceError> {
        self.metrics(period, user_id)?;
        self.stats(period, user_id)?;
        for chart_type in CHART_TYPES {
            self.chart_config(chart_type);
        }
        Ok(())
    }

    pub fn manager(&self) -> &Arc<CacheManager> {
        &self.manager
    }
}

#[allow(clippy::ptr_arg)]
fn lookup_chart(chart_type: &String) -> ChartConfig {
    chart_config_for(chart_type)
}
