//! Error types for the timing system.

use thiserror::Error;

/// Errors that can occur while configuring timing or reporting measurements.
///
/// None of these ever replace the result of a timed operation: the
/// interceptor logs and drops sink errors.
#[derive(Debug, Error)]
pub enum TimingError {
    /// Failed to parse a timing configuration
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Failed to read a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sink rejected a measurement
    #[error("Sink error: {0}")]
    Sink(String),

    /// A sink's internal lock was poisoned by a panicking writer
    #[error("Sink lock poisoned")]
    SinkPoisoned,

    /// The process-wide default interceptor was already set
    #[error("Default interceptor is already installed")]
    AlreadyInstalled,
}

/// Result type for timing operations.
pub type TimingResult<T> = Result<T, TimingError>;
