//! # Notification Services
//!
//! This crate delivers transactional email for the YelpCamp application.
//! The only message today is the password-reset link; delivery goes through
//! AWS SES behind a [`Mailer`] trait so handlers can be tested with a double.

/// Mail delivery service and the password-reset message.
pub mod service;
/// Types and errors used by the notification services.
pub mod types;

pub use service::{NotificationService, SesMailer};
pub use types::{Mailer, NotificationError};
