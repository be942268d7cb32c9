//! Payments and a hand-written timing proxy
//!
//! [`TimedPayment`] gives the same effect as `#[log_execution_time]` through
//! plain composition: it implements [`Payment`], times the call and
//! delegates to the payment it wraps. [`Store`] only sees `dyn Payment`, so
//! either can be handed to it.

use std::sync::{Arc, Mutex};
use thiserror::Error;
use timing::{Outcome, ReportSink, ScopedTimer};

/// Operation name reported by [`TimedPayment`].
pub const PAY_OPERATION: &str = concat!(module_path!(), "::pay");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Amounts must be positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: i64, available: i64 },
}

/// Something that can take a payment.
pub trait Payment: Send + Sync {
    fn pay(&self, amount: i64) -> Result<(), PaymentError>;
}

impl<P: Payment + ?Sized> Payment for Arc<P> {
    fn pay(&self, amount: i64) -> Result<(), PaymentError> {
        (**self).pay(amount)
    }
}

impl<P: Payment + ?Sized> Payment for Box<P> {
    fn pay(&self, amount: i64) -> Result<(), PaymentError> {
        (**self).pay(amount)
    }
}

/// Cash payment, optionally drawn from a limited balance.
#[derive(Debug, Default)]
pub struct Cash {
    balance: Option<Mutex<i64>>,
}

impl Cash {
    /// Cash with no balance limit.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(balance: i64) -> Self {
        Self {
            balance: Some(Mutex::new(balance)),
        }
    }

    /// Remaining balance, or `None` when unlimited.
    pub fn balance(&self) -> Option<i64> {
        self.balance
            .as_ref()
            .map(|b| *b.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

impl Payment for Cash {
    fn pay(&self, amount: i64) -> Result<(), PaymentError> {
        if amount <= 0 {
            return Err(PaymentError::InvalidAmount(amount));
        }

        if let Some(balance) = &self.balance {
            let mut available = balance.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if *available < amount {
                return Err(PaymentError::InsufficientFunds {
                    requested: amount,
                    available: *available,
                });
            }
            *available -= amount;
        }

        tracing::info!(target: "clinic::payment", amount, "paid in cash");
        Ok(())
    }
}

/// Timing proxy over another payment.
pub struct TimedPayment<P> {
    inner: P,
    sink: Arc<dyn ReportSink>,
}

impl<P: Payment> TimedPayment<P> {
    pub fn new(inner: P, sink: Arc<dyn ReportSink>) -> Self {
        Self { inner, sink }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Payment> Payment for TimedPayment<P> {
    fn pay(&self, amount: i64) -> Result<(), PaymentError> {
        let mut timer = ScopedTimer::new(PAY_OPERATION, &*self.sink);
        let result = self.inner.pay(amount);
        if result.is_err() {
            timer.set_outcome(Outcome::Failed);
        }
        result
    }
}

/// A store that takes payments through whatever [`Payment`] it is given.
pub struct Store {
    payment: Box<dyn Payment>,
}

impl Store {
    pub fn new(payment: impl Payment + 'static) -> Self {
        Self {
            payment: Box::new(payment),
        }
    }

    pub fn buy_something(&self, amount: i64) -> Result<(), PaymentError> {
        self.payment.pay(amount)
    }
}
