//! Chart configuration lookup table.

use serde::{Deserialize, Serialize};

/// Chart types with a dedicated configuration.
pub const CHART_TYPES: [&str; 4] = ["efficiency", "accuracy", "performance", "memory"];

/// Fallback used for unknown chart types.
pub const DEFAULT_CHART_TYPE: &str = "efficiency";

/// Presentation settings for one dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    pub color: String,
    pub unit: String,
}

impl ChartConfig {
    fn new(title: &str, color: &str, unit: &str) -> Self {
        Self {
            title: title.to_string(),
            color: color.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// Looks up the configuration for `chart_type`, defaulting to efficiency.
pub fn chart_config_for(chart_type: &str) -> ChartConfig {
    match chart_type {
        "accuracy" => ChartConfig::new("Model Accuracy", "#F27244", "%"),
        "performance" => ChartConfig::new("Processing Time", "#00D9FF", "ms"),
        "memory" => ChartConfig::new("Memory Usage", "#FF00FF", "MB"),
        _ => ChartConfig::new("AI Efficiency", "#BBF244", "%"),
    }
}
