//! Transmit scheduling
//!
//! A periodic timer raises [`TransmitRequest`]; the dispatch loop consumes it.
//! [`TransmitScheduler`] owns the timer and reprograms it when the profile
//! changes.

pub mod request;
pub mod timer;

pub use request::TransmitRequest;
pub use timer::{PeriodicTimer, TransmitScheduler};
