//! Platform error types
//!
//! HAL-specific errors are mapped onto these variants first, then onto the
//! core's [`BusError`] where the sampling logic needs them.

use core::fmt;
use embedded_hal_async::i2c::ErrorKind;
use sensor_node_core::BusError;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum PlatformError {
    /// I2C operation failed
    I2c(I2cError),
    /// Timer operation failed
    Timer(TimerError),
}

/// I2C-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum I2cError {
    /// Bus error occurred
    BusError,
    /// No acknowledgment received
    Nack,
    /// Arbitration lost
    ArbitrationLost,
    /// Timeout occurred
    Timeout,
    /// Transfer does not fit the adapter's frame buffer
    FrameTooLong,
}

/// Timer-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum TimerError {
    /// Zero period requested
    InvalidDuration,
}

impl PlatformError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PlatformError::I2c(I2cError::BusError) => "I2C bus error",
            PlatformError::I2c(I2cError::Nack) => "I2C NACK",
            PlatformError::I2c(I2cError::ArbitrationLost) => "I2C arbitration lost",
            PlatformError::I2c(I2cError::Timeout) => "I2C timeout",
            PlatformError::I2c(I2cError::FrameTooLong) => "I2C frame too long",
            PlatformError::Timer(TimerError::InvalidDuration) => "timer period is zero",
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<I2cError> for PlatformError {
    fn from(error: I2cError) -> Self {
        PlatformError::I2c(error)
    }
}

impl From<TimerError> for PlatformError {
    fn from(error: TimerError) -> Self {
        PlatformError::Timer(error)
    }
}

impl From<ErrorKind> for I2cError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(_) => I2cError::Nack,
            ErrorKind::ArbitrationLoss => I2cError::ArbitrationLost,
            _ => I2cError::BusError,
        }
    }
}

impl From<I2cError> for BusError {
    fn from(error: I2cError) -> Self {
        match error {
            I2cError::Nack => BusError::Nack,
            I2cError::Timeout => BusError::Timeout,
            I2cError::BusError | I2cError::ArbitrationLost | I2cError::FrameTooLong => {
                BusError::Bus
            }
        }
    }
}
