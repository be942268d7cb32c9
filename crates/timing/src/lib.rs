//! Execution Timing
//!
//! This crate measures and reports how long operations take, without the
//! operations knowing about it:
//! - `#[log_execution_time]` marks a function or method for timing
//! - [`Interceptor`] runs an operation, measures it and reports the result
//! - [`ScopedTimer`] reports from `Drop`, so every exit path is measured
//! - [`ReportSink`]s decide where reports go (tracing, memory, metrics)
//! - [`TimingMetrics`] and [`TimingBudget`] summarize and flag slow calls
//!
//! # Feature Flags
//!
//! - `macros` (default): re-exports the `#[log_execution_time]` attribute
//!
//! # Example
//!
//! ```rust
//! use timing::{log_execution_time, Instrumented, Interceptor, MemorySink};
//! use std::sync::Arc;
//!
//! struct Clinic {
//!     interceptor: Interceptor,
//! }
//!
//! impl Instrumented for Clinic {
//!     fn interceptor(&self) -> &Interceptor {
//!         &self.interceptor
//!     }
//! }
//!
//! impl Clinic {
//!     #[log_execution_time]
//!     fn count_pets(&self) -> usize {
//!         3
//!     }
//! }
//!
//! let sink = Arc::new(MemorySink::new());
//! let clinic = Clinic { interceptor: Interceptor::from_arc(sink.clone()) };
//!
//! assert_eq!(clinic.count_pets(), 3);
//! assert_eq!(sink.len(), 1);
//! ```

// Lets `#[log_execution_time]` expansions name `::timing` inside this crate.
extern crate self as timing;

mod budget;
mod config;
mod error;
mod interceptor;
mod measurement;
mod metrics;
mod sink;
mod timer;

pub use budget::*;
pub use config::TimingConfig;
pub use error::{TimingError, TimingResult};
pub use interceptor::{default_interceptor, install_default_interceptor, Instrumented, Interceptor};
pub use measurement::{Measurement, Outcome};
pub use metrics::*;
pub use sink::{FanoutSink, MemorySink, ReportSink, TracingSink};
pub use timer::ScopedTimer;

#[cfg(feature = "macros")]
pub use timing_macros::log_execution_time;

/// Re-export for convenience
pub use std::time::{Duration, Instant};
