//! Outbound delivery of the final report
//!
//! [`HttpNotifier`] posts `{number, message}` to a messaging API once per
//! call. Delivery never raises: every outcome is reported through a
//! [`DeliveryResult`] and logged.

pub mod config;
pub mod error;
pub mod notifier;

pub use config::{DEFAULT_CONTENT_TYPE, NotifierConfig};
pub use error::DeliveryError;
pub use notifier::{DeliveryResult, HttpNotifier, Notify};
