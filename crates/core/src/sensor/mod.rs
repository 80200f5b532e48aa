//! Sensor kinds, registry and bus access
//!
//! - [`kind`]: The three sensor kinds and their collector ids
//! - [`registry`]: Fixed slot table of currently enabled sensors
//! - [`bus`]: Register-level bus trait and the per-kind channel mapping
//! - [`conversion`]: Raw register bytes to engineering values

pub mod bus;
pub mod conversion;
pub mod kind;
pub mod registry;

pub use bus::{initialize_sensor, read_sensor, ChannelMap, SensorBus, SensorChannel};
pub use kind::{SensorKind, SENSOR_KIND_COUNT};
pub use registry::{SensorRecord, SensorRegistry};
