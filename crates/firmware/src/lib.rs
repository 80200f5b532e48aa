#![cfg_attr(not(test), no_std)]

//! sensor_node_firmware - Embassy firmware for the adaptive telemetry node
//!
//! This crate wires the pure scheduling logic of `sensor_node_core` to the
//! RP2350 / Pico 2 W: I2C sensor bus, enable-line GPIOs, CYW43 Wi-Fi and the
//! embassy-net TCP stack.
//!
//! # Design Principles
//!
//! - **Embassy tasks**: One task per long-lived worker, sample loop on core 1
//! - **Platform implementations**: Bus, timer and transport adapters for the core traits
//! - **Compiled-in configuration**: Build-time environment, validated once at boot
//! - **Host testable**: Everything outside `platform::rp2350` builds and tests on the host

// Logging macros (log_info!, log_warn!, log_error!, log_debug!, log_trace!)
// are exported at crate root via #[macro_export]
pub mod logging;

pub mod config;
pub mod node;
pub mod platform;
pub mod report;
