//! Host-side collaborators
//!
//! Always available (not behind `cfg(test)`) so integration tests and the
//! firmware's host tests can drive the loops without hardware. All mocks
//! are `no_std` and fixed-capacity.

mod bus;
mod delay;
mod link;
mod sink;
mod timer;
mod transport;

pub use bus::{BusOp, MockBus};
pub use delay::MockDelay;
pub use link::MockLink;
pub use sink::MockSink;
pub use timer::{MockTimer, MockTimerError, TimerOp};
pub use transport::MockTransport;
