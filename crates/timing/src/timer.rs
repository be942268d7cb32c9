//! Scoped timers that report when their scope exits

use crate::measurement::{Measurement, Outcome};
use crate::sink::ReportSink;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

/// A timer that measures elapsed time from creation to drop.
///
/// The stop and report step lives in `Drop`, so it runs exactly once on
/// every exit path: normal return, early return, `?`, and panic unwinding.
///
/// # Example
///
/// ```rust
/// use timing::{MemorySink, ScopedTimer};
///
/// let sink = MemorySink::new();
/// {
///     let _timer = ScopedTimer::new("load_owner", &sink);
///     // ... work ...
/// } // reported here
/// assert_eq!(sink.len(), 1);
/// ```
pub struct ScopedTimer<'a> {
    operation: &'a str,
    start: Instant,
    sink: Option<&'a dyn ReportSink>,
    outcome: Option<Outcome>,
    /// Set when the timer starts inside a destructor that runs during
    /// unwinding. Only a panic that begins after the start counts.
    panicking_at_start: bool,
}

impl<'a> ScopedTimer<'a> {
    /// Create a timer that reports to `sink`.
    ///
    /// The timer starts immediately upon creation.
    #[inline]
    pub fn new(operation: &'a str, sink: &'a dyn ReportSink) -> Self {
        Self {
            operation,
            start: Instant::now(),
            sink: Some(sink),
            outcome: None,
            panicking_at_start: thread::panicking(),
        }
    }

    /// Create a timer that measures but never reports.
    #[inline]
    pub fn silent(operation: &'a str) -> Self {
        Self {
            operation,
            start: Instant::now(),
            sink: None,
            outcome: None,
            panicking_at_start: thread::panicking(),
        }
    }

    /// Get the elapsed duration.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get the elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the name of the timed operation.
    #[inline]
    pub fn name(&self) -> &str {
        self.operation
    }

    /// Get the start instant.
    #[inline]
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Whether this timer will report when dropped.
    #[inline]
    pub fn is_reporting(&self) -> bool {
        self.sink.is_some()
    }

    /// Record the exit path the report should carry.
    ///
    /// Without this, a timer dropped by a panic raised after it started
    /// reports [`Outcome::Panicked`] and any other drop reports
    /// [`Outcome::Completed`].
    #[inline]
    pub fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    /// Stop the timer now with the given outcome and report it.
    #[inline]
    pub fn finish(mut self, outcome: Outcome) {
        self.set_outcome(outcome);
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let stopped_at = Instant::now();
        let Some(sink) = self.sink else {
            return;
        };

        let outcome = self.outcome.unwrap_or_else(|| {
            if thread::panicking() && !self.panicking_at_start {
                Outcome::Panicked
            } else {
                Outcome::Completed
            }
        });
        let measurement = Measurement::new(self.operation, self.start, stopped_at, outcome);
        report(sink, &measurement);
    }
}

/// Hand a measurement to the sink without letting a sink failure escape.
fn report(sink: &dyn ReportSink, measurement: &Measurement) {
    // A second panic while unwinding aborts regardless, so only catch on
    // the normal path.
    let result = if thread::panicking() {
        Ok(sink.record(measurement))
    } else {
        panic::catch_unwind(AssertUnwindSafe(|| sink.record(measurement)))
    };

    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            tracing::warn!(
                target: "timing",
                operation = measurement.operation(),
                error = %err,
                "timing report dropped"
            );
        }
        Err(_) => {
            tracing::warn!(
                target: "timing",
                operation = measurement.operation(),
                "timing sink panicked, report dropped"
            );
        }
    }
}

/// Macro for easy scope timing.
///
/// Binds a [`ScopedTimer`] from the given interceptor that reports when the
/// enclosing scope ends.
///
/// # Example
///
/// ```rust
/// use timing::{time_scope, Interceptor, MemorySink};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let interceptor = Interceptor::from_arc(sink.clone());
///
/// fn do_work(interceptor: &Interceptor) {
///     time_scope!(interceptor, "work");
///     // ... work ...
/// } // Timer reports here
///
/// do_work(&interceptor);
/// assert_eq!(sink.len(), 1);
/// ```
#[macro_export]
macro_rules! time_scope {
    ($interceptor:expr, $name:expr) => {
        let _timer = $crate::Interceptor::start(&$interceptor, $name);
    };
}
