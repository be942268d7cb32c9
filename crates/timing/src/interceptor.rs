//! Execution-timing interceptor
//!
//! An [`Interceptor`] wraps an arbitrary operation, measures its wall-clock
//! duration and reports the [`Measurement`](crate::Measurement) to a
//! [`ReportSink`]. It never inspects which operation it wraps and never
//! touches the result: values, errors and panics reach the caller exactly
//! as the operation produced them.

use crate::config::TimingConfig;
use crate::error::{TimingError, TimingResult};
use crate::measurement::Outcome;
use crate::sink::{ReportSink, TracingSink};
use crate::timer::ScopedTimer;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Process-wide interceptor used by marked free functions.
static DEFAULT_INTERCEPTOR: OnceLock<Interceptor> = OnceLock::new();

/// Get the process-wide default interceptor.
///
/// Unless [`install_default_interceptor`] ran first, this is an interceptor
/// over a plain [`TracingSink`].
pub fn default_interceptor() -> &'static Interceptor {
    DEFAULT_INTERCEPTOR.get_or_init(|| Interceptor::new(TracingSink::new()))
}

/// Set the process-wide default interceptor.
///
/// Fails with [`TimingError::AlreadyInstalled`] once the default has been
/// installed or first used.
pub fn install_default_interceptor(interceptor: Interceptor) -> TimingResult<()> {
    DEFAULT_INTERCEPTOR
        .set(interceptor)
        .map_err(|_| TimingError::AlreadyInstalled)
}

/// Types whose methods carry the `#[log_execution_time]` marker.
///
/// The marker routes each call through the interceptor this returns, so the
/// owner decides where reports go.
pub trait Instrumented {
    fn interceptor(&self) -> &Interceptor;
}

/// Generic wrapper that times and reports the operations it runs.
///
/// Cloning is cheap; clones share the same sink.
///
/// # Example
///
/// ```rust
/// use timing::{Interceptor, MemorySink, Outcome};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let interceptor = Interceptor::from_arc(sink.clone());
///
/// let parsed: Result<u32, _> = interceptor.call_fallible("parse", || "42".parse::<u32>());
/// assert_eq!(parsed, Ok(42));
///
/// let reports = sink.measurements().unwrap();
/// assert_eq!(reports[0].outcome(), Outcome::Completed);
/// ```
#[derive(Clone)]
pub struct Interceptor {
    sink: Arc<dyn ReportSink>,
    enabled: bool,
}

impl Interceptor {
    /// Create an interceptor that reports to `sink`.
    pub fn new(sink: impl ReportSink + 'static) -> Self {
        Self::from_arc(Arc::new(sink))
    }

    /// Create an interceptor over a shared sink.
    pub fn from_arc(sink: Arc<dyn ReportSink>) -> Self {
        Self {
            sink,
            enabled: true,
        }
    }

    /// Create an interceptor that honours `config.enabled`.
    pub fn from_config(config: &TimingConfig, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            sink,
            enabled: config.enabled,
        }
    }

    /// Create an interceptor that runs operations without measuring them.
    pub fn disabled() -> Self {
        Self {
            sink: Arc::new(TracingSink::new()),
            enabled: false,
        }
    }

    /// Check if measuring is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable measuring.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Sink that receives this interceptor's reports.
    pub fn sink(&self) -> &Arc<dyn ReportSink> {
        &self.sink
    }

    /// Start a scoped timer for `operation`.
    ///
    /// The timer reports when dropped, or never when this interceptor is
    /// disabled.
    #[inline]
    pub fn start<'a>(&'a self, operation: &'a str) -> ScopedTimer<'a> {
        if self.enabled {
            ScopedTimer::new(operation, &*self.sink)
        } else {
            ScopedTimer::silent(operation)
        }
    }

    /// Run `f`, report its duration, and return its result untouched.
    ///
    /// A panic in `f` is reported as [`Outcome::Panicked`] and keeps
    /// unwinding.
    #[inline]
    pub fn call<R>(&self, operation: &str, f: impl FnOnce() -> R) -> R {
        let _timer = self.start(operation);
        f()
    }

    /// Like [`call`](Self::call), but an `Err` is reported as
    /// [`Outcome::Failed`] before it is handed back.
    #[inline]
    pub fn call_fallible<T, E>(
        &self,
        operation: &str,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut timer = self.start(operation);
        let result = f();
        if result.is_err() {
            timer.set_outcome(Outcome::Failed);
        }
        result
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl Default for Interceptor {
    fn default() -> Self {
        Self::new(TracingSink::new())
    }
}
