//! Platform abstraction layer
//!
//! Adapters between the core traits and the hardware. Only `rp2350` needs
//! the target; the rest builds and tests on the host.

pub mod bus;
pub mod error;
pub mod timer;

#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use bus::{HalSensorBus, BUS_TIMEOUT_MS};
pub use error::{PlatformError, Result};
pub use timer::{SignalTimer, TimerCommand, TimerCommands};
