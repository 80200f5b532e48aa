//! Mock platform implementation for testing
//!
//! Available during test builds and with the `mock` feature. Core
//! collaborators (sensor bus, transport, timer) have mocks in
//! `sensor_node_core::mock`; this module only mocks the HAL-level pieces the
//! firmware adapters sit on.

#![cfg(any(test, feature = "mock"))]

mod i2c;

pub use i2c::{I2cTransaction, MockI2c, MockI2cError};
