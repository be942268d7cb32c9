//! Report sinks that receive timing measurements

use crate::budget::TimingBudget;
use crate::error::{TimingError, TimingResult};
use crate::measurement::Measurement;
use std::sync::{Arc, Mutex};

/// Destination for timing reports.
///
/// Sinks are shared between threads, so implementations synchronize any
/// state they keep. An error returned from [`record`](ReportSink::record)
/// is logged and dropped by the timer; it never reaches the caller of the
/// timed operation.
pub trait ReportSink: Send + Sync {
    /// Record one measurement.
    fn record(&self, measurement: &Measurement) -> TimingResult<()>;
}

impl<S: ReportSink + ?Sized> ReportSink for Arc<S> {
    fn record(&self, measurement: &Measurement) -> TimingResult<()> {
        (**self).record(measurement)
    }
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn record(&self, measurement: &Measurement) -> TimingResult<()> {
        (**self).record(measurement)
    }
}

/// Sink that emits one `tracing` event per measurement.
///
/// Events use target `timing` at `INFO`, or `WARN` when a budget is set and
/// the measurement exceeds it.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    budget: Option<TimingBudget>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warn about measurements that exceed `budget`.
    pub fn with_budget(budget: TimingBudget) -> Self {
        Self {
            budget: Some(budget),
        }
    }

    pub fn budget(&self) -> Option<&TimingBudget> {
        self.budget.as_ref()
    }
}

impl ReportSink for TracingSink {
    fn record(&self, measurement: &Measurement) -> TimingResult<()> {
        let elapsed_ms = measurement.elapsed_ms();
        let violation = self
            .budget
            .as_ref()
            .and_then(|budget| budget.check(measurement.operation(), elapsed_ms));

        match violation {
            Some(violation) => tracing::warn!(
                target: "timing",
                operation = measurement.operation(),
                elapsed_ms = elapsed_ms,
                budget_ms = violation.budget_ms,
                severity = ?violation.severity,
                outcome = %measurement.outcome(),
                "{} (over budget)",
                measurement
            ),
            None => tracing::info!(
                target: "timing",
                operation = measurement.operation(),
                elapsed_ms = elapsed_ms,
                outcome = %measurement.outcome(),
                "{}",
                measurement
            ),
        }
        Ok(())
    }
}

/// Sink that keeps every measurement in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Measurement>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded measurements, in arrival order.
    pub fn measurements(&self) -> TimingResult<Vec<Measurement>> {
        self.records
            .lock()
            .map(|records| records.clone())
            .map_err(|_| TimingError::SinkPoisoned)
    }

    /// Measurements recorded for one operation.
    pub fn measurements_for(&self, operation: &str) -> TimingResult<Vec<Measurement>> {
        Ok(self
            .measurements()?
            .into_iter()
            .filter(|m| m.operation() == operation)
            .collect())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl ReportSink for MemorySink {
    fn record(&self, measurement: &Measurement) -> TimingResult<()> {
        self.records
            .lock()
            .map_err(|_| TimingError::SinkPoisoned)?
            .push(measurement.clone());
        Ok(())
    }
}

/// Sink that forwards each measurement to several sinks.
///
/// Every sink is tried even if an earlier one fails; the first error is
/// returned.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a sink.
    pub fn with(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ReportSink for FanoutSink {
    fn record(&self, measurement: &Measurement) -> TimingResult<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.record(measurement) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
