//! sensor_node_core - Pure no_std telemetry logic for the sensor node firmware
//!
//! This crate contains the scheduling and transmission algorithms of the node
//! without any executor, HAL or network stack dependency. Everything here can
//! be tested on the host.
//!
//! # Design Principles
//!
//! - **Zero feature cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies outside of tests
//! - **Trait abstractions**: Bus, timer, transport and delay injected via traits
//! - **Explicit shared state**: Every piece of state touched from more than one
//!   context is a `const`-constructible handle that workers borrow
//!
//! # Modules
//!
//! - [`sensor`]: Sensor kinds, slot-table registry, bus mapping and conversions
//! - [`hotplug`]: Enable-line edge handling
//! - [`profile`]: Negotiated profile value and its interval table
//! - [`scheduler`]: Transmit request flag and periodic timer reconfiguration
//! - [`protocol`]: Collector request encoding and profile response parsing
//! - [`transmit`]: Transmission task state machine, in-flight limiter, counters
//! - [`loops`]: Sample loop and dispatch loop ticks
//! - [`link`]: Network association retry policy
//! - [`mock`]: Host-side collaborators for tests
//! - [`error`]: Error taxonomy

#![cfg_attr(not(test), no_std)]

pub mod error;
pub mod hotplug;
pub mod link;
pub mod loops;
pub mod mock;
pub mod profile;
pub mod protocol;
pub mod scheduler;
pub mod sensor;
pub mod transmit;

pub use error::{BusError, ConfigError, NetworkError, NodeError, ParseError, SampleError};
pub use profile::ProfileState;
pub use scheduler::TransmitRequest;
pub use sensor::{SensorKind, SensorRecord, SensorRegistry};
