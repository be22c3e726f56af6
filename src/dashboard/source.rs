//! Metrics Source
//!
//! The data collaborator behind the dashboard caches, plus an in-memory
//! implementation used by the server binary and the tests.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

// == Source Error ==
/// Failure reported by a metrics source. Passed through the cache untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("metrics source unavailable: {0}")]
    Unavailable(String),
}

// == Metrics Source Trait ==
/// Anything that can produce dashboard data for a period and a user.
///
/// Returned values must be JSON; the cache never looks inside them.
pub trait MetricsSource: Send + Sync {
    /// Aggregated metric series and averages for `period`.
    fn fetch_metrics(&self, period: &str, user_id: i64) -> Result<Value, SourceError>;

    /// Consolidated statistics for `period`.
    fn metric_stats(&self, period: &str, user_id: i64) -> Result<Value, SourceError>;
}

// == Period ==
/// Reporting window. Unrecognized labels mean the whole history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    All,
}

impl Period {
    pub fn parse(label: &str) -> Self {
        match label {
            "24h" => Period::Day,
            "7d" => Period::Week,
            "30d" => Period::Month,
            _ => Period::All,
        }
    }

    /// How far back the window reaches, None for the whole history.
    pub fn window(&self) -> Option<Duration> {
        match self {
            Period::Day => Some(Duration::hours(24)),
            Period::Week => Some(Duration::days(7)),
            Period::Month => Some(Duration::days(30)),
            Period::All => None,
        }
    }
}

// == Metric Sample ==
/// One recorded observation of the monitored model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    pub ia_efficiency: f64,
    pub model_accuracy: f64,
    pub processing_time_ms: f64,
    pub memory_usage_mb: f64,
    /// Fraction in [0, 1]; reported as a percentage
    pub error_rate: f64,
}

// == In-Memory Source ==
/// Metrics source backed by a vector of samples.
#[derive(Debug, Default)]
pub struct InMemoryMetricsSource {
    samples: RwLock<Vec<MetricSample>>,
}

impl InMemoryMetricsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(samples: Vec<MetricSample>) -> Self {
        Self {
            samples: RwLock::new(samples),
        }
    }

    pub fn record(&self, sample: MetricSample) {
        self.samples.write().push(sample);
    }

    fn samples_for(&self, period: Period, user_id: i64) -> Vec<MetricSample> {
        let since = period.window().map(|window| Utc::now() - window);
        let mut selected: Vec<MetricSample> = self
            .samples
            .read()
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter(|s| since.map_or(true, |since| s.timestamp >= since))
            .cloned()
            .collect();
        selected.sort_by_key(|s| s.timestamp);
        selected
    }
}

impl MetricsSource for InMemoryMetricsSource {
    fn fetch_metrics(&self, period: &str, user_id: i64) -> Result<Value, SourceError> {
        let samples = self.samples_for(Period::parse(period), user_id);
        if samples.is_empty() {
            warn!("No metrics found for user_id={}, period={}", user_id, period);
        } else {
            info!("Loaded {} metrics for period {}", samples.len(), period);
        }

        let efficiency = series(&samples, |s| s.ia_efficiency);
        let accuracy = series(&samples, |s| s.model_accuracy);
        let processing_time = series(&samples, |s| s.processing_time_ms);
        let memory_usage = series(&samples, |s| s.memory_usage_mb);
        let error_rate = series(&samples, |s| s.error_rate * 100.0);
        let timestamps: Vec<String> = samples.iter().map(|s| s.timestamp.to_rfc3339()).collect();

        Ok(json!({
            "avg_efficiency": mean(&efficiency),
            "avg_accuracy": mean(&accuracy),
            "avg_processing_time": mean(&processing_time),
            "avg_memory": mean(&memory_usage),
            "avg_error_rate": mean(&error_rate),
            "ia_efficiency": efficiency,
            "model_accuracy": accuracy,
            "processing_time": processing_time,
            "memory_usage": memory_usage,
            "error_rate": error_rate,
            "timestamps": timestamps,
            "periodo": period,
            "total_metrics": samples.len(),
        }))
    }

    fn metric_stats(&self, period: &str, user_id: i64) -> Result<Value, SourceError> {
        let data = self.fetch_metrics(period, user_id)?;
        let field = |name: &str| data[name].as_f64().unwrap_or(0.0);

        Ok(json!({
            "total_records": data["total_metrics"].as_u64().unwrap_or(0),
            "avg_efficiency": round_to(field("avg_efficiency"), 3),
            "avg_accuracy": round_to(field("avg_accuracy"), 3),
            "avg_processing_time": round_to(field("avg_processing_time"), 2),
            "avg_memory_usage": round_to(field("avg_memory"), 2),
            "avg_error_rate": round_to(field("avg_error_rate"), 2),
            "periodo": period,
            "last_updated": Utc::now().to_rfc3339(),
        }))
    }
}

fn series(samples: &[MetricSample], field: impl Fn(&MetricSample) -> f64) -> Vec<f64> {
    samples.iter().map(field).collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
