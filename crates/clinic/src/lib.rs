//! Pet Clinic
//!
//! Owners, pets and visits, with form-style handlers whose every call is
//! timed by the `timing` crate:
//!
//! - [`model`] - owners, pets and visits
//! - [`repository`] - storage traits and in-memory implementations
//! - [`form`] - owner form binding and validation
//! - [`view`] - view descriptors returned by handlers
//! - [`owner_controller`] - owner handlers marked `#[log_execution_time]`
//! - [`payment`] - payments and a hand-written timing proxy

mod error;
pub mod form;
pub mod model;
pub mod owner_controller;
pub mod payment;
pub mod repository;
pub mod view;

pub use error::{ClinicError, ClinicResult};
pub use form::{BindingErrors, FieldError, OwnerForm};
pub use model::{Owner, Pet, Visit};
pub use owner_controller::OwnerController;
pub use payment::{Cash, Payment, PaymentError, Store, TimedPayment};
pub use repository::{
    InMemoryOwnerRepository, InMemoryVisitRepository, OwnerRepository, VisitRepository,
};
pub use view::View;
