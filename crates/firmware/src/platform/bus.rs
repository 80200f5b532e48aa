//! I2C sensor bus adapter
//!
//! Implements the core [`SensorBus`] on any `embedded-hal-async` I2C driver.
//! Register reads are a write-read of the register address; register
//! writes prepend the register address to the data. Every transaction races
//! a delay and loses to it after `timeout_ms`.

use super::error::I2cError;
use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{Error as _, I2c};
use heapless::Vec;
use sensor_node_core::sensor::SensorBus;
use sensor_node_core::BusError;

/// Default per-transaction bound
pub const BUS_TIMEOUT_MS: u32 = 50;

/// Largest register write payload (register byte excluded)
const MAX_WRITE_LEN: usize = 8;

pub struct HalSensorBus<I, D> {
    i2c: I,
    delay: D,
    timeout_ms: u32,
}

impl<I: I2c, D: DelayNs> HalSensorBus<I, D> {
    pub fn new(i2c: I, delay: D, timeout_ms: u32) -> Self {
        Self {
            i2c,
            delay,
            timeout_ms,
        }
    }

    pub fn i2c(&self) -> &I {
        &self.i2c
    }
}

impl<I: I2c, D: DelayNs> SensorBus for HalSensorBus<I, D> {
    async fn read(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), BusError> {
        let Self {
            i2c,
            delay,
            timeout_ms,
        } = self;
        match select(
            i2c.write_read(address, &[register], buffer),
            delay.delay_ms(*timeout_ms),
        )
        .await
        {
            Either::First(result) => result.map_err(|e| I2cError::from(e.kind()).into()),
            Either::Second(()) => Err(I2cError::Timeout.into()),
        }
    }

    async fn write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), BusError> {
        let mut frame: Vec<u8, { MAX_WRITE_LEN + 1 }> = Vec::new();
        let _ = frame.push(register);
        frame
            .extend_from_slice(data)
            .map_err(|_| BusError::from(I2cError::FrameTooLong))?;

        let Self {
            i2c,
            delay,
            timeout_ms,
        } = self;
        match select(i2c.write(address, &frame), delay.delay_ms(*timeout_ms)).await {
            Either::First(result) => result.map_err(|e| I2cError::from(e.kind()).into()),
            Either::Second(()) => Err(I2cError::Timeout.into()),
        }
    }
}
