//! The two long-lived workers
//!
//! Each loop is a plain struct with an async `tick`; the firmware drives it
//! from an embassy ticker and the tests call `tick` directly.
//!
//! - [`sample`]: Reads enabled sensors and applies profile changes
//! - [`dispatch`]: Turns a transmit request into one payload per sensor

pub mod dispatch;
pub mod sample;

pub use dispatch::{DispatchLoop, DispatchRound, PayloadSink};
pub use sample::{ProfileChange, SampleLoop, SampleReport};
