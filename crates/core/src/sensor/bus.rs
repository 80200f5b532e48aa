//! Sensor bus abstraction
//!
//! The core never talks to a bus peripheral directly. It reads and writes
//! device registers through [`SensorBus`], which the firmware implements on
//! top of the HAL I2C driver and the tests implement with
//! [`crate::mock::MockBus`].
//!
//! Each sensor kind maps to at most one [`SensorChannel`] (device address
//! plus data register). The mapping lives in a [`ChannelMap`] so a build can
//! attach a gas sensor without touching the sampling logic.

use super::conversion;
use super::kind::{SensorKind, SENSOR_KIND_COUNT};
use crate::error::{BusError, SampleError};

/// Register-level bus access
///
/// Implementations must bound every transaction in time and report a
/// timeout as [`BusError::Timeout`]; the sample loop relies on this to
/// never block indefinitely.
#[allow(async_fn_in_trait)]
pub trait SensorBus {
    /// Read `buffer.len()` bytes starting at `register` of device `address`
    async fn read(&mut self, address: u8, register: u8, buffer: &mut [u8])
        -> Result<(), BusError>;

    /// Write `data` to `register` of device `address`
    async fn write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), BusError>;
}

/// Device address and data register for one sensor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorChannel {
    /// 7-bit device address
    pub address: u8,
    /// Register holding the 2-byte reading
    pub register: u8,
}

/// Ambient light sensor channel
pub const LIGHT_CHANNEL: SensorChannel = SensorChannel {
    address: 0x10,
    register: 0x04,
};

/// Temperature sensor channel
pub const TEMPERATURE_CHANNEL: SensorChannel = SensorChannel {
    address: 0x50,
    register: 0x00,
};

/// Light sensor configuration writes, applied in order after registration
const LIGHT_INIT_SEQUENCE: [(u8, [u8; 2]); 4] = [
    (0x00, [0x00, 0x13]),
    (0x01, [0x00, 0x00]),
    (0x02, [0x00, 0x00]),
    (0x03, [0x00, 0x00]),
];

/// Per-kind channel mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMap {
    channels: [Option<SensorChannel>; SENSOR_KIND_COUNT],
}

impl ChannelMap {
    /// Reference board: light and temperature wired, no gas channel
    pub const fn reference() -> Self {
        let mut channels = [None; SENSOR_KIND_COUNT];
        channels[SensorKind::Light.index()] = Some(LIGHT_CHANNEL);
        channels[SensorKind::Temperature.index()] = Some(TEMPERATURE_CHANNEL);
        Self { channels }
    }

    /// Replace the channel of one kind
    pub fn with_channel(mut self, kind: SensorKind, channel: Option<SensorChannel>) -> Self {
        self.channels[kind.index()] = channel;
        self
    }

    /// Channel for `kind`, if one is wired
    pub fn channel(&self, kind: SensorKind) -> Option<SensorChannel> {
        self.channels[kind.index()]
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self::reference()
    }
}

/// Read one sensor and convert the raw bytes
///
/// Returns `Ok(None)` when the kind has no wired channel.
pub async fn read_sensor<B: SensorBus>(
    bus: &mut B,
    channels: &ChannelMap,
    kind: SensorKind,
) -> Result<Option<u16>, SampleError> {
    let Some(channel) = channels.channel(kind) else {
        return Ok(None);
    };

    let mut raw = [0u8; 2];
    bus.read(channel.address, channel.register, &mut raw).await?;

    let value = match kind {
        SensorKind::Light => conversion::light_lux(raw),
        SensorKind::Temperature => conversion::temperature_celsius(raw)?,
        SensorKind::Gas => conversion::gas_raw(raw),
    };
    Ok(Some(value))
}

/// Run the configuration sequence a freshly enabled sensor needs
///
/// Only the light sensor has one; other kinds succeed immediately.
pub async fn initialize_sensor<B: SensorBus>(
    bus: &mut B,
    channels: &ChannelMap,
    kind: SensorKind,
) -> Result<(), BusError> {
    if kind != SensorKind::Light {
        return Ok(());
    }
    let Some(channel) = channels.channel(kind) else {
        return Ok(());
    };
    for (register, data) in LIGHT_INIT_SEQUENCE {
        bus.write(channel.address, register, &data).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{BusOp, MockBus};

    #[tokio::test]
    async fn test_read_light_uses_reference_channel() {
        let mut bus = MockBus::new();
        bus.set_register(0x10, 0x04, [0x10, 0x00]);

        let value = read_sensor(&mut bus, &ChannelMap::reference(), SensorKind::Light).await;
        assert_eq!(value, Ok(Some(29)));
    }

    #[tokio::test]
    async fn test_read_temperature() {
        let mut bus = MockBus::new();
        bus.set_register(0x50, 0x00, [0x06, 0x40]);

        let value =
            read_sensor(&mut bus, &ChannelMap::reference(), SensorKind::Temperature).await;
        assert_eq!(value, Ok(Some(12)));
    }

    #[tokio::test]
    async fn test_unwired_gas_is_not_sampled() {
        let mut bus = MockBus::new();

        let value = read_sensor(&mut bus, &ChannelMap::reference(), SensorKind::Gas).await;
        assert_eq!(value, Ok(None));
        assert!(bus.operations().is_empty());
    }

    #[tokio::test]
    async fn test_wired_gas_reads_raw_count() {
        let mut bus = MockBus::new();
        bus.set_register(0x48, 0x00, [0x2C, 0x01]);
        let channels = ChannelMap::reference().with_channel(
            SensorKind::Gas,
            Some(SensorChannel {
                address: 0x48,
                register: 0x00,
            }),
        );

        let value = read_sensor(&mut bus, &channels, SensorKind::Gas).await;
        assert_eq!(value, Ok(Some(300)));
    }

    #[tokio::test]
    async fn test_bus_error_propagates() {
        let mut bus = MockBus::new();
        bus.fail_address(0x50, BusError::Nack);

        let value =
            read_sensor(&mut bus, &ChannelMap::reference(), SensorKind::Temperature).await;
        assert_eq!(value, Err(SampleError::Bus(BusError::Nack)));
    }

    #[tokio::test]
    async fn test_light_initialization_sequence() {
        let mut bus = MockBus::new();

        initialize_sensor(&mut bus, &ChannelMap::reference(), SensorKind::Light)
            .await
            .unwrap();

        let writes: std::vec::Vec<BusOp> = bus.operations().iter().copied().collect();
        assert_eq!(
            writes,
            [
                BusOp::Write {
                    address: 0x10,
                    register: 0x00,
                    data: [0x00, 0x13]
                },
                BusOp::Write {
                    address: 0x10,
                    register: 0x01,
                    data: [0x00, 0x00]
                },
                BusOp::Write {
                    address: 0x10,
                    register: 0x02,
                    data: [0x00, 0x00]
                },
                BusOp::Write {
                    address: 0x10,
                    register: 0x03,
                    data: [0x00, 0x00]
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_temperature_needs_no_initialization() {
        let mut bus = MockBus::new();
        initialize_sensor(&mut bus, &ChannelMap::reference(), SensorKind::Temperature)
            .await
            .unwrap();
        assert!(bus.operations().is_empty());
    }
}
