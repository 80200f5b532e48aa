//! Error taxonomy for the sensor node
//!
//! Errors are grouped by how far they are allowed to travel:
//!
//! - [`ConfigError`]: fatal, raised while building the node configuration at boot
//! - [`NetworkError`]: transient, swallowed at the transmission task boundary
//! - [`ParseError`]: the collector answered but no profile could be extracted
//! - [`BusError`] / [`SampleError`]: one sensor read failed, the next tick retries
//!
//! An enable-line edge landing while a record is being updated has no variant
//! here. The registry makes that interleaving impossible instead of reporting
//! it (see [`crate::sensor::SensorRegistry`]).

use core::fmt;

/// Top-level node error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeError {
    /// Startup configuration is unusable, the node must not start
    Configuration(ConfigError),
    /// A network step failed, the sample is dropped
    TransientNetwork(NetworkError),
    /// Collector response carried no usable profile
    ProtocolParse(ParseError),
}

/// Configuration errors (fatal at boot)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Collector host is empty
    EmptyCollectorHost,
    /// Collector host or user agent does not fit its fixed capacity
    ValueTooLong {
        /// Name of the offending setting
        name: &'static str,
    },
    /// Value contains characters that would break the request framing
    InvalidCharacters {
        /// Name of the offending setting
        name: &'static str,
    },
    /// Collector port is zero
    InvalidPort,
    /// A numeric setting could not be parsed
    InvalidNumber {
        /// Name of the offending setting
        name: &'static str,
    },
    /// A period or timeout is zero
    ZeroDuration {
        /// Name of the offending setting
        name: &'static str,
    },
    /// Response limits are inconsistent (chunk larger than the response, or above capacity)
    InvalidResponseLimits,
    /// IPv4 address setting is malformed
    InvalidIpv4 {
        /// Name of the offending setting
        name: &'static str,
    },
}

/// Transient network errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// Link-layer association or address acquisition is not complete
    LinkDown,
    /// Collector name could not be resolved
    Resolve,
    /// Resolution succeeded but returned no usable address
    NoAddress,
    /// Connection was refused or could not be opened
    Connect,
    /// Request could not be written in one shot
    Send,
    /// Response could not be read
    Receive,
    /// Operation exceeded its time bound
    Timeout,
}

/// Profile response parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// No `#` marker in the response
    MissingMarker,
    /// Marker present but not followed by a decimal integer
    MissingDigits,
    /// Integer after the marker does not fit in an `i32`
    OutOfRange,
    /// Response exceeded the configured maximum size
    ResponseTooLarge,
}

/// Sensor bus errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Device did not acknowledge
    Nack,
    /// Transaction exceeded its time bound
    Timeout,
    /// Any other bus fault (arbitration, framing)
    Bus,
}

/// Errors raised while sampling one sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    /// Bus transaction failed
    Bus(BusError),
    /// Raw reading cannot be converted (e.g. a zero temperature code)
    InvalidRaw {
        /// Raw code that was rejected
        raw: u16,
    },
}

impl From<ConfigError> for NodeError {
    fn from(e: ConfigError) -> Self {
        NodeError::Configuration(e)
    }
}

impl From<NetworkError> for NodeError {
    fn from(e: NetworkError) -> Self {
        NodeError::TransientNetwork(e)
    }
}

impl From<ParseError> for NodeError {
    fn from(e: ParseError) -> Self {
        NodeError::ProtocolParse(e)
    }
}

impl From<BusError> for SampleError {
    fn from(e: BusError) -> Self {
        SampleError::Bus(e)
    }
}

impl NetworkError {
    /// Short static label, usable by log backends that cannot run `Display`
    pub const fn as_str(&self) -> &'static str {
        match self {
            NetworkError::LinkDown => "link down",
            NetworkError::Resolve => "address resolution failed",
            NetworkError::NoAddress => "no address for collector",
            NetworkError::Connect => "connect failed",
            NetworkError::Send => "send failed",
            NetworkError::Receive => "receive failed",
            NetworkError::Timeout => "timed out",
        }
    }
}

impl ParseError {
    /// Short static label, usable by log backends that cannot run `Display`
    pub const fn as_str(&self) -> &'static str {
        match self {
            ParseError::MissingMarker => "profile marker missing",
            ParseError::MissingDigits => "no digits after profile marker",
            ParseError::OutOfRange => "profile value out of range",
            ParseError::ResponseTooLarge => "response exceeds maximum size",
        }
    }
}

impl BusError {
    /// Short static label, usable by log backends that cannot run `Display`
    pub const fn as_str(&self) -> &'static str {
        match self {
            BusError::Nack => "nack",
            BusError::Timeout => "bus timeout",
            BusError::Bus => "bus fault",
        }
    }
}

impl SampleError {
    /// Short static label, usable by log backends that cannot run `Display`
    pub const fn as_str(&self) -> &'static str {
        match self {
            SampleError::Bus(e) => e.as_str(),
            SampleError::InvalidRaw { .. } => "invalid raw reading",
        }
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::Configuration(e) => write!(f, "Configuration error: {}", e),
            NodeError::TransientNetwork(e) => write!(f, "Network error: {}", e),
            NodeError::ProtocolParse(e) => write!(f, "Protocol error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyCollectorHost => write!(f, "collector host is empty"),
            ConfigError::ValueTooLong { name } => write!(f, "{} is too long", name),
            ConfigError::InvalidCharacters { name } => {
                write!(f, "{} contains invalid characters", name)
            }
            ConfigError::InvalidPort => write!(f, "collector port must be non-zero"),
            ConfigError::InvalidNumber { name } => write!(f, "{} is not a valid number", name),
            ConfigError::ZeroDuration { name } => write!(f, "{} must be non-zero", name),
            ConfigError::InvalidResponseLimits => write!(f, "invalid response limits"),
            ConfigError::InvalidIpv4 { name } => write!(f, "{} is not an IPv4 address", name),
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Bus(e) => write!(f, "bus error: {}", e),
            SampleError::InvalidRaw { raw } => write!(f, "invalid raw reading {:#06x}", raw),
        }
    }
}
