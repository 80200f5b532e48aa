//! Sensor kinds

use core::fmt;

/// Number of sensor kinds (and registry slots)
pub const SENSOR_KIND_COUNT: usize = 3;

/// Hot-pluggable sensor kind
///
/// Each kind owns one enable line and one registry slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Ambient light sensor
    Light,
    /// Temperature sensor
    Temperature,
    /// Gas sensor
    Gas,
}

impl SensorKind {
    /// All kinds in slot order
    pub const ALL: [SensorKind; SENSOR_KIND_COUNT] =
        [SensorKind::Light, SensorKind::Temperature, SensorKind::Gas];

    /// Identifier sent to the collector as `sensor_id`
    pub const fn sensor_id(self) -> u8 {
        match self {
            SensorKind::Light => 1,
            SensorKind::Temperature => 2,
            SensorKind::Gas => 3,
        }
    }

    /// Look up a kind by its collector identifier
    pub const fn from_sensor_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(SensorKind::Light),
            2 => Some(SensorKind::Temperature),
            3 => Some(SensorKind::Gas),
            _ => None,
        }
    }

    /// Registry slot index
    pub const fn index(self) -> usize {
        match self {
            SensorKind::Light => 0,
            SensorKind::Temperature => 1,
            SensorKind::Gas => 2,
        }
    }

    /// Human-readable name for logging
    pub const fn name(self) -> &'static str {
        match self {
            SensorKind::Light => "light",
            SensorKind::Temperature => "temperature",
            SensorKind::Gas => "gas",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
