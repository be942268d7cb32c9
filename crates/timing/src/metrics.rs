//! Metrics collection for timed operations

use crate::budget::{BudgetViolation, TimingBudget};
use crate::config::TimingConfig;
use crate::error::{TimingError, TimingResult};
use crate::measurement::{Measurement, Outcome};
use crate::sink::ReportSink;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

/// Per-operation timing metrics.
///
/// Keeps a bounded window of recent samples for every operation name, plus
/// lifetime counts of failed and panicked calls.
#[derive(Debug, Clone)]
pub struct TimingMetrics {
    /// Recent durations in milliseconds, keyed by operation name
    samples: HashMap<String, VecDeque<f64>>,
    /// Calls per operation since the last reset
    calls: HashMap<String, usize>,
    failures: HashMap<String, usize>,
    panics: HashMap<String, usize>,
    /// Budget for violation checking
    budget: TimingBudget,
    /// Maximum samples to keep per operation (to prevent unbounded growth)
    max_samples: usize,
    enabled: bool,
}

impl TimingMetrics {
    /// Create a metrics collector with default settings.
    pub fn new() -> Self {
        Self {
            samples: HashMap::new(),
            calls: HashMap::new(),
            failures: HashMap::new(),
            panics: HashMap::new(),
            budget: TimingBudget::default(),
            max_samples: 1000,
            enabled: true,
        }
    }

    /// Create a metrics collector with a custom budget.
    pub fn with_budget(budget: TimingBudget) -> Self {
        Self {
            budget,
            ..Self::new()
        }
    }

    /// Create a metrics collector from configuration.
    pub fn from_config(config: &TimingConfig) -> Self {
        Self {
            budget: config.budget.clone(),
            max_samples: config.max_samples.max(1),
            enabled: config.enabled,
            ..Self::new()
        }
    }

    /// Set the maximum number of samples to keep per operation.
    pub fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = max.max(1);
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one measurement.
    pub fn record(&mut self, measurement: &Measurement) {
        if !self.enabled {
            return;
        }

        let operation = measurement.operation();
        let duration_ms = measurement.elapsed_ms();

        let window = self.samples.entry(operation.to_string()).or_default();
        if window.len() >= self.max_samples {
            window.pop_front();
        }
        window.push_back(duration_ms);

        *self.calls.entry(operation.to_string()).or_insert(0) += 1;
        match measurement.outcome() {
            Outcome::Completed => {}
            Outcome::Failed => *self.failures.entry(operation.to_string()).or_insert(0) += 1,
            Outcome::Panicked => *self.panics.entry(operation.to_string()).or_insert(0) += 1,
        }

        tracing::trace!(
            target: "timing::metrics",
            operation = operation,
            duration_ms = duration_ms,
            "measurement recorded"
        );
    }

    /// Get a summary of all collected metrics.
    pub fn summary(&self) -> MetricsSummary {
        let operations: BTreeMap<String, OperationStats> = self
            .samples
            .iter()
            .map(|(name, window)| {
                let samples: Vec<f64> = window.iter().copied().collect();
                let stats = OperationStats {
                    timing: TimingStats::from_samples(&samples),
                    calls: self.calls.get(name).copied().unwrap_or(0),
                    failures: self.failures.get(name).copied().unwrap_or(0),
                    panics: self.panics.get(name).copied().unwrap_or(0),
                };
                (name.clone(), stats)
            })
            .collect();

        MetricsSummary {
            total_calls: self.calls.values().sum(),
            operations,
        }
    }

    /// Check the latest sample of every operation against the budget.
    ///
    /// Violations are sorted by operation name.
    pub fn check_budget(&self) -> Vec<BudgetViolation> {
        let mut violations: Vec<BudgetViolation> = self
            .samples
            .iter()
            .filter_map(|(name, window)| {
                window
                    .back()
                    .and_then(|&last| self.budget.check(name, last))
            })
            .collect();
        violations.sort_by(|a, b| a.operation.cmp(&b.operation));
        violations
    }

    pub fn budget(&self) -> &TimingBudget {
        &self.budget
    }

    pub fn set_budget(&mut self, budget: TimingBudget) {
        self.budget = budget;
    }

    /// Reset all collected metrics.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.calls.clear();
        self.failures.clear();
        self.panics.clear();
    }

    /// Get the raw sample window of one operation.
    pub fn samples(&self, operation: &str) -> Option<&VecDeque<f64>> {
        self.samples.get(operation)
    }
}

impl Default for TimingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink that feeds measurements into [`TimingMetrics`].
#[derive(Debug, Default)]
pub struct MetricsSink {
    metrics: Mutex<TimingMetrics>,
}

impl MetricsSink {
    pub fn new(metrics: TimingMetrics) -> Self {
        Self {
            metrics: Mutex::new(metrics),
        }
    }

    pub fn from_config(config: &TimingConfig) -> Self {
        Self::new(TimingMetrics::from_config(config))
    }

    pub fn summary(&self) -> TimingResult<MetricsSummary> {
        self.metrics
            .lock()
            .map(|metrics| metrics.summary())
            .map_err(|_| TimingError::SinkPoisoned)
    }

    pub fn check_budget(&self) -> TimingResult<Vec<BudgetViolation>> {
        self.metrics
            .lock()
            .map(|metrics| metrics.check_budget())
            .map_err(|_| TimingError::SinkPoisoned)
    }

    pub fn reset(&self) {
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.reset();
        }
    }
}

impl ReportSink for MetricsSink {
    fn record(&self, measurement: &Measurement) -> TimingResult<()> {
        self.metrics
            .lock()
            .map_err(|_| TimingError::SinkPoisoned)?
            .record(measurement);
        Ok(())
    }
}

/// Summary of collected metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    /// Statistics for each operation, sorted by name
    pub operations: BTreeMap<String, OperationStats>,
    /// Total number of calls recorded
    pub total_calls: usize,
}

/// Statistics for one operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStats {
    /// Timing statistics over the sample window
    pub timing: TimingStats,
    pub calls: usize,
    pub failures: usize,
    pub panics: usize,
}

/// Statistical summary of timing data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingStats {
    /// Number of samples
    pub count: usize,
    /// Minimum time in milliseconds
    pub min_ms: f64,
    /// Maximum time in milliseconds
    pub max_ms: f64,
    /// Mean time in milliseconds
    pub mean_ms: f64,
    /// Median time in milliseconds
    pub median_ms: f64,
    /// 95th percentile in milliseconds
    pub p95_ms: f64,
    /// 99th percentile in milliseconds
    pub p99_ms: f64,
    /// Standard deviation in milliseconds
    pub std_dev_ms: f64,
    /// Total time in milliseconds
    pub total_ms: f64,
}

impl TimingStats {
    /// Calculate statistics from a slice of samples.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let count = samples.len();
        let mut sorted: Vec<f64> = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let total_ms: f64 = samples.iter().sum();
        let mean_ms = total_ms / count as f64;

        let median_ms = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        let variance: f64 =
            samples.iter().map(|x| (x - mean_ms).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            min_ms: sorted[0],
            max_ms: sorted[count - 1],
            mean_ms,
            median_ms,
            p95_ms: percentile(&sorted, 95.0),
            p99_ms: percentile(&sorted, 99.0),
            std_dev_ms: variance.sqrt(),
            total_ms,
        }
    }
}

/// Calculate a percentile from sorted samples.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] + fraction * (sorted[upper] - sorted[lower])
    }
}
