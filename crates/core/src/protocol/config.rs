//! Collector endpoint configuration

use crate::error::ConfigError;
use heapless::String;

/// Longest collector host name or address literal
pub const MAX_HOST_LEN: usize = 64;

/// Longest `User-Agent` value
pub const MAX_USER_AGENT_LEN: usize = 48;

/// Where readings go and how requests identify themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Host name or dotted IPv4 address
    pub host: String<MAX_HOST_LEN>,
    /// TCP port
    pub port: u16,
    /// `User-Agent` header value
    pub user_agent: String<MAX_USER_AGENT_LEN>,
}

impl CollectorConfig {
    /// Validate and build a collector configuration
    ///
    /// Values end up verbatim in the request head, so whitespace and line
    /// breaks are rejected in the host and line breaks in the user agent.
    pub fn new(host: &str, port: u16, user_agent: &str) -> Result<Self, ConfigError> {
        if host.is_empty() {
            return Err(ConfigError::EmptyCollectorHost);
        }
        if host.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control()) {
            return Err(ConfigError::InvalidCharacters {
                name: "COLLECTOR_HOST",
            });
        }
        if user_agent.bytes().any(|b| b.is_ascii_control()) {
            return Err(ConfigError::InvalidCharacters {
                name: "COLLECTOR_USER_AGENT",
            });
        }
        if port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let host = String::try_from(host).map_err(|_| ConfigError::ValueTooLong {
            name: "COLLECTOR_HOST",
        })?;
        let user_agent = String::try_from(user_agent).map_err(|_| ConfigError::ValueTooLong {
            name: "COLLECTOR_USER_AGENT",
        })?;

        Ok(Self {
            host,
            port,
            user_agent,
        })
    }
}
