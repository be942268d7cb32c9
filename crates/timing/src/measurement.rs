//! Timing measurements produced by a single invocation

use std::fmt;
use std::time::{Duration, Instant};

/// How a timed operation exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The operation returned normally (or returned `Ok`)
    Completed,
    /// The operation returned `Err`
    Failed,
    /// The operation unwound with a panic
    Panicked,
}

impl Outcome {
    /// Lowercase name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::Failed => "failed",
            Outcome::Panicked => "panicked",
        }
    }

    /// Whether the operation did not complete normally.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Outcome::Completed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start/stop instants for one invocation of a timed operation.
///
/// Created fresh by a [`ScopedTimer`](crate::ScopedTimer) when its scope
/// exits and handed to a [`ReportSink`](crate::ReportSink) by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    operation: String,
    started_at: Instant,
    stopped_at: Instant,
    outcome: Outcome,
}

impl Measurement {
    /// Create a measurement from its start and stop instants.
    pub fn new(
        operation: impl Into<String>,
        started_at: Instant,
        stopped_at: Instant,
        outcome: Outcome,
    ) -> Self {
        Self {
            operation: operation.into(),
            started_at,
            stopped_at,
            outcome,
        }
    }

    /// Name of the timed operation.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn stopped_at(&self) -> Instant {
        self.stopped_at
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Elapsed wall-clock time. Never negative.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.stopped_at.saturating_duration_since(self.started_at)
    }

    /// Elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Human-readable, single-line report.
    pub fn pretty_print(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in {:.3}ms",
            self.operation,
            self.outcome,
            self.elapsed_ms()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_from_instants() {
        let start = Instant::now();
        let stop = start + Duration::from_millis(25);
        let m = Measurement::new("owners::show", start, stop, Outcome::Completed);

        assert_eq!(m.elapsed(), Duration::from_millis(25));
        assert!((m.elapsed_ms() - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_elapsed_never_negative() {
        let stop = Instant::now();
        let start = stop + Duration::from_millis(5);
        let m = Measurement::new("backwards", start, stop, Outcome::Completed);

        assert_eq!(m.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_pretty_print() {
        let start = Instant::now();
        let m = Measurement::new(
            "payment::pay",
            start,
            start + Duration::from_micros(1500),
            Outcome::Failed,
        );

        assert_eq!(m.pretty_print(), "payment::pay failed in 1.500ms");
    }

    #[test]
    fn test_outcome_failure() {
        assert!(!Outcome::Completed.is_failure());
        assert!(Outcome::Failed.is_failure());
        assert!(Outcome::Panicked.is_failure());
    }
}
