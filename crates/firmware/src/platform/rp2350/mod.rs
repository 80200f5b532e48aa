//! RP2350 / Pico 2 W platform bindings
//!
//! Everything here needs the embassy runtime and the target HAL, so the
//! module only exists with the `pico2_w` feature.

pub mod network;
pub mod tasks;
pub mod transport;

pub use network::{wifi_init_task, WifiLink, WifiPeripherals};
pub use transport::{EmbassyTransport, OfflineTransport};
