//! Timing budgets and violation tracking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Timing budget configuration.
///
/// Defines the acceptable duration of timed operations. A default limit
/// applies to every operation unless a per-operation limit overrides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingBudget {
    /// Limit in milliseconds for operations without an explicit entry.
    pub default_max_ms: f64,

    /// Per-operation limits in milliseconds, keyed by operation name.
    pub operations: HashMap<String, f64>,
}

impl TimingBudget {
    /// Create a budget with a single default limit.
    pub fn new(default_max_ms: f64) -> Self {
        Self {
            default_max_ms,
            operations: HashMap::new(),
        }
    }

    /// Builder method to set the limit of one operation.
    pub fn with_operation(mut self, operation: impl Into<String>, max_ms: f64) -> Self {
        self.operations.insert(operation.into(), max_ms);
        self
    }

    /// Limit that applies to `operation`.
    pub fn limit_for(&self, operation: &str) -> f64 {
        self.operations
            .get(operation)
            .copied()
            .unwrap_or(self.default_max_ms)
    }

    /// Check if a measurement is within budget.
    pub fn is_within(&self, operation: &str, ms: f64) -> bool {
        ms <= self.limit_for(operation)
    }

    /// Remaining time before the operation would exceed its budget.
    pub fn headroom(&self, operation: &str, ms: f64) -> f64 {
        self.limit_for(operation) - ms
    }

    /// Build a violation if `ms` exceeds the operation's limit.
    pub fn check(&self, operation: &str, ms: f64) -> Option<BudgetViolation> {
        let budget_ms = self.limit_for(operation);
        if ms > budget_ms {
            Some(BudgetViolation::new(
                operation,
                ms,
                budget_ms,
                violation_severity(ms, budget_ms),
            ))
        } else {
            None
        }
    }
}

impl Default for TimingBudget {
    /// Default budget allows 100ms per operation.
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Calculate violation severity based on how much the actual exceeds budget.
pub(crate) fn violation_severity(actual: f64, budget: f64) -> ViolationSeverity {
    let ratio = actual / budget;
    if ratio > 3.0 {
        ViolationSeverity::Critical
    } else if ratio > 2.0 {
        ViolationSeverity::High
    } else if ratio > 1.5 {
        ViolationSeverity::Medium
    } else {
        ViolationSeverity::Low
    }
}

/// Severity level of a budget violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    /// Minor violation (1-1.5x budget)
    Low,
    /// Moderate violation (1.5-2x budget)
    Medium,
    /// Significant violation (2-3x budget)
    High,
    /// Severe violation (>3x budget)
    Critical,
}

/// A timing budget violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetViolation {
    /// Operation that exceeded its limit
    pub operation: String,
    /// Measured time in milliseconds
    pub actual_ms: f64,
    /// Budget threshold in milliseconds
    pub budget_ms: f64,
    pub severity: ViolationSeverity,
}

impl BudgetViolation {
    pub fn new(
        operation: impl Into<String>,
        actual_ms: f64,
        budget_ms: f64,
        severity: ViolationSeverity,
    ) -> Self {
        Self {
            operation: operation.into(),
            actual_ms,
            budget_ms,
            severity,
        }
    }

    /// How much the actual time exceeds the budget.
    pub fn excess_ms(&self) -> f64 {
        self.actual_ms - self.budget_ms
    }

    /// Ratio of actual to budget (2.0 means 2x over budget).
    pub fn ratio(&self) -> f64 {
        if self.budget_ms > 0.0 {
            self.actual_ms / self.budget_ms
        } else {
            f64::INFINITY
        }
    }
}
