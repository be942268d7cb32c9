//! Error types for the clinic.

use crate::payment::PaymentError;
use thiserror::Error;

/// Errors raised by clinic handlers and repositories.
#[derive(Debug, Error)]
pub enum ClinicError {
    /// No owner with this id exists
    #[error("Owner {0} not found")]
    OwnerNotFound(u32),

    /// A payment was rejected
    #[error("Payment failed: {0}")]
    Payment(#[from] PaymentError),

    /// The backing store could not be accessed
    #[error("Storage error: {0}")]
    Storage(String),

    /// A view model could not be built
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for clinic operations.
pub type ClinicResult<T> = Result<T, ClinicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ClinicError::OwnerNotFound(7).to_string(), "Owner 7 not found");
        assert_eq!(
            ClinicError::Storage("lock poisoned".to_string()).to_string(),
            "Storage error: lock poisoned"
        );
    }

    #[test]
    fn test_payment_error_conversion() {
        let err: ClinicError = PaymentError::InvalidAmount(-5).into();
        assert!(matches!(err, ClinicError::Payment(PaymentError::InvalidAmount(-5))));
    }
}
