//! Timing configuration

use crate::budget::TimingBudget;
use crate::error::TimingResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for interceptors and the metrics they feed.
///
/// Every field has a default, so an empty JSON object is a valid config.
///
/// ```rust
/// use timing::TimingConfig;
///
/// let config = TimingConfig::from_json_str(r#"{"budget":{"defaultMaxMs":25.0}}"#).unwrap();
/// assert!(config.enabled);
/// assert_eq!(config.budget.default_max_ms, 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingConfig {
    /// Whether interceptors measure and report at all
    pub enabled: bool,
    /// Maximum samples to keep per operation in [`TimingMetrics`](crate::TimingMetrics)
    pub max_samples: usize,
    /// Slow-call thresholds
    pub budget: TimingBudget,
}

impl TimingConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> TimingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> TimingResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_budget(mut self, budget: TimingBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = max;
        self
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_samples: 1000,
            budget: TimingBudget::default(),
        }
    }
}
