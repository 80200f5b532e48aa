//! Compiled-in node configuration
//!
//! `build.rs` forwards every setting as a `rustc-env` variable (with a
//! default when unset), so all values are string literals in the binary.
//! [`NodeConfig::from_build_env`] parses and validates them once at boot;
//! any error is fatal.
//!
//! | Variable               | Default                  |
//! |------------------------|--------------------------|
//! | `WIFI_SSID`            | (empty: Wi-Fi disabled)  |
//! | `WIFI_PASSWORD`        | (empty)                  |
//! | `WIFI_DHCP`            | `true`                   |
//! | `WIFI_IP`              | `0.0.0.0`                |
//! | `WIFI_NETMASK`         | `255.255.255.0`          |
//! | `WIFI_GATEWAY`         | `0.0.0.0`                |
//! | `COLLECTOR_HOST`       | `192.168.2.77`           |
//! | `COLLECTOR_PORT`       | `80`                     |
//! | `COLLECTOR_USER_AGENT` | `sensor-node/1.0 rp2350` |
//! | `SAMPLE_PERIOD_MS`     | `1000`                   |
//! | `DISPATCH_PERIOD_MS`   | `1000`                   |
//! | `LAUNCH_STAGGER_MS`    | `100`                    |
//! | `READ_TIMEOUT_MS`      | `5000`                   |
//! | `MAX_RESPONSE_LEN`     | `512`                    |

use core::str::FromStr;
use heapless::String;
use sensor_node_core::protocol::{CollectorConfig, ResponseLimits};
use sensor_node_core::ConfigError;

/// Raw settings as strings, before parsing
#[derive(Debug, Clone, Copy)]
pub struct BuildSettings<'a> {
    pub wifi_ssid: &'a str,
    pub wifi_password: &'a str,
    pub wifi_dhcp: &'a str,
    pub wifi_ip: &'a str,
    pub wifi_netmask: &'a str,
    pub wifi_gateway: &'a str,
    pub collector_host: &'a str,
    pub collector_port: &'a str,
    pub collector_user_agent: &'a str,
    pub sample_period_ms: &'a str,
    pub dispatch_period_ms: &'a str,
    pub launch_stagger_ms: &'a str,
    pub read_timeout_ms: &'a str,
    pub max_response_len: &'a str,
}

impl BuildSettings<'static> {
    /// Settings baked in by `build.rs`
    pub const fn from_env() -> Self {
        Self {
            wifi_ssid: env!("WIFI_SSID"),
            wifi_password: env!("WIFI_PASSWORD"),
            wifi_dhcp: env!("WIFI_DHCP"),
            wifi_ip: env!("WIFI_IP"),
            wifi_netmask: env!("WIFI_NETMASK"),
            wifi_gateway: env!("WIFI_GATEWAY"),
            collector_host: env!("COLLECTOR_HOST"),
            collector_port: env!("COLLECTOR_PORT"),
            collector_user_agent: env!("COLLECTOR_USER_AGENT"),
            sample_period_ms: env!("SAMPLE_PERIOD_MS"),
            dispatch_period_ms: env!("DISPATCH_PERIOD_MS"),
            launch_stagger_ms: env!("LAUNCH_STAGGER_MS"),
            read_timeout_ms: env!("READ_TIMEOUT_MS"),
            max_response_len: env!("MAX_RESPONSE_LEN"),
        }
    }
}

/// Wi-Fi station configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiConfig {
    /// Network SSID (max 32 chars)
    pub ssid: String<32>,
    /// WPA2 passphrase (max 63 chars)
    pub password: String<63>,
    /// Use DHCP for IP configuration
    pub use_dhcp: bool,
    /// Static IP address (used if use_dhcp = false)
    pub static_ip: [u8; 4],
    /// Network mask (used if use_dhcp = false)
    pub netmask: [u8; 4],
    /// Gateway address (used if use_dhcp = false)
    pub gateway: [u8; 4],
}

impl WifiConfig {
    /// Returns false if SSID is empty (Wi-Fi stays off)
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }

    /// CIDR prefix length of the netmask
    pub fn prefix_len(&self) -> u8 {
        u32::from_be_bytes(self.netmask).leading_ones() as u8
    }
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            use_dhcp: true,
            static_ip: [0, 0, 0, 0],
            netmask: [255, 255, 255, 0],
            gateway: [0, 0, 0, 0],
        }
    }
}

/// Loop periods and network time bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Sample loop period
    pub sample_period_ms: u64,
    /// Dispatch loop poll period
    pub dispatch_period_ms: u64,
    /// Delay between consecutive launches in one dispatch round
    pub launch_stagger_ms: u32,
    /// Bound on each connect, send and receive
    pub read_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: 1_000,
            dispatch_period_ms: 1_000,
            launch_stagger_ms: 100,
            read_timeout_ms: 5_000,
        }
    }
}

/// Complete, validated node configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub wifi: WifiConfig,
    pub collector: CollectorConfig,
    pub timing: TimingConfig,
    pub limits: ResponseLimits,
}

impl NodeConfig {
    /// Parse the settings compiled into this binary
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::parse(&BuildSettings::from_env())
    }

    pub fn parse(settings: &BuildSettings<'_>) -> Result<Self, ConfigError> {
        let wifi = WifiConfig {
            ssid: String::try_from(settings.wifi_ssid)
                .map_err(|_| ConfigError::ValueTooLong { name: "WIFI_SSID" })?,
            password: String::try_from(settings.wifi_password).map_err(|_| {
                ConfigError::ValueTooLong {
                    name: "WIFI_PASSWORD",
                }
            })?,
            use_dhcp: parse_bool(settings.wifi_dhcp, "WIFI_DHCP")?,
            static_ip: parse_ipv4(settings.wifi_ip, "WIFI_IP")?,
            netmask: parse_ipv4(settings.wifi_netmask, "WIFI_NETMASK")?,
            gateway: parse_ipv4(settings.wifi_gateway, "WIFI_GATEWAY")?,
        };

        let port = parse_number::<u16>(settings.collector_port, "COLLECTOR_PORT")?;
        let collector = CollectorConfig::new(
            settings.collector_host,
            port,
            settings.collector_user_agent,
        )?;

        let timing = TimingConfig {
            sample_period_ms: parse_duration(settings.sample_period_ms, "SAMPLE_PERIOD_MS")?,
            dispatch_period_ms: parse_duration(
                settings.dispatch_period_ms,
                "DISPATCH_PERIOD_MS",
            )?,
            // Zero stagger is allowed: launches back to back
            launch_stagger_ms: parse_number(settings.launch_stagger_ms, "LAUNCH_STAGGER_MS")?,
            read_timeout_ms: parse_duration(settings.read_timeout_ms, "READ_TIMEOUT_MS")?,
        };

        let limits = ResponseLimits {
            max_response_len: parse_number(settings.max_response_len, "MAX_RESPONSE_LEN")?,
            ..ResponseLimits::REFERENCE
        };
        limits.validate()?;

        Ok(Self {
            wifi,
            collector,
            timing,
            limits,
        })
    }
}

fn parse_number<T: FromStr>(value: &str, name: &'static str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { name })
}

fn parse_duration(value: &str, name: &'static str) -> Result<u64, ConfigError> {
    match parse_number::<u64>(value, name)? {
        0 => Err(ConfigError::ZeroDuration { name }),
        ms => Ok(ms),
    }
}

fn parse_bool(value: &str, name: &'static str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidNumber { name }),
    }
}

fn parse_ipv4(value: &str, name: &'static str) -> Result<[u8; 4], ConfigError> {
    core::net::Ipv4Addr::from_str(value.trim())
        .map(|addr| addr.octets())
        .map_err(|_| ConfigError::InvalidIpv4 { name })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> BuildSettings<'static> {
        BuildSettings {
            wifi_ssid: "",
            wifi_password: "",
            wifi_dhcp: "true",
            wifi_ip: "0.0.0.0",
            wifi_netmask: "255.255.255.0",
            wifi_gateway: "0.0.0.0",
            collector_host: "192.168.2.77",
            collector_port: "80",
            collector_user_agent: "sensor-node/1.0 rp2350",
            sample_period_ms: "1000",
            dispatch_period_ms: "1000",
            launch_stagger_ms: "100",
            read_timeout_ms: "5000",
            max_response_len: "512",
        }
    }

    #[test]
    fn test_defaults_parse() {
        let config = NodeConfig::parse(&defaults()).unwrap();

        assert!(!config.wifi.is_configured());
        assert!(config.wifi.use_dhcp);
        assert_eq!(config.collector.host.as_str(), "192.168.2.77");
        assert_eq!(config.collector.port, 80);
        assert_eq!(config.timing, TimingConfig::default());
        assert_eq!(config.limits, ResponseLimits::REFERENCE);
    }

    #[test]
    fn test_build_env_parses() {
        // build.rs always provides every variable
        assert!(NodeConfig::from_build_env().is_ok());
    }

    #[test]
    fn test_static_ip_settings() {
        let settings = BuildSettings {
            wifi_ssid: "TestNetwork",
            wifi_password: "password123",
            wifi_dhcp: "false",
            wifi_ip: "192.168.1.100",
            wifi_netmask: "255.255.0.0",
            wifi_gateway: "192.168.1.1",
            ..defaults()
        };

        let config = NodeConfig::parse(&settings).unwrap();

        assert!(config.wifi.is_configured());
        assert!(!config.wifi.use_dhcp);
        assert_eq!(config.wifi.static_ip, [192, 168, 1, 100]);
        assert_eq!(config.wifi.gateway, [192, 168, 1, 1]);
        assert_eq!(config.wifi.prefix_len(), 16);
    }

    #[test]
    fn test_empty_collector_host_is_fatal() {
        let settings = BuildSettings {
            collector_host: "",
            ..defaults()
        };
        assert_eq!(
            NodeConfig::parse(&settings),
            Err(ConfigError::EmptyCollectorHost)
        );
    }

    #[test]
    fn test_bad_port() {
        let zero = BuildSettings {
            collector_port: "0",
            ..defaults()
        };
        let garbage = BuildSettings {
            collector_port: "http",
            ..defaults()
        };
        assert_eq!(NodeConfig::parse(&zero), Err(ConfigError::InvalidPort));
        assert_eq!(
            NodeConfig::parse(&garbage),
            Err(ConfigError::InvalidNumber {
                name: "COLLECTOR_PORT"
            })
        );
    }

    #[test]
    fn test_zero_periods_rejected() {
        let settings = BuildSettings {
            sample_period_ms: "0",
            ..defaults()
        };
        assert_eq!(
            NodeConfig::parse(&settings),
            Err(ConfigError::ZeroDuration {
                name: "SAMPLE_PERIOD_MS"
            })
        );
    }

    #[test]
    fn test_zero_stagger_allowed() {
        let settings = BuildSettings {
            launch_stagger_ms: "0",
            ..defaults()
        };
        assert_eq!(NodeConfig::parse(&settings).unwrap().timing.launch_stagger_ms, 0);
    }

    #[test]
    fn test_response_limit_below_chunk_rejected() {
        let settings = BuildSettings {
            max_response_len: "64",
            ..defaults()
        };
        assert_eq!(
            NodeConfig::parse(&settings),
            Err(ConfigError::InvalidResponseLimits)
        );
    }

    #[test]
    fn test_malformed_ip_rejected() {
        let settings = BuildSettings {
            wifi_ip: "192.168.1",
            ..defaults()
        };
        assert_eq!(
            NodeConfig::parse(&settings),
            Err(ConfigError::InvalidIpv4 { name: "WIFI_IP" })
        );
    }

    #[test]
    fn test_overlong_ssid_rejected() {
        let settings = BuildSettings {
            wifi_ssid: "123456789012345678901234567890123",
            ..defaults()
        };
        assert_eq!(
            NodeConfig::parse(&settings),
            Err(ConfigError::ValueTooLong { name: "WIFI_SSID" })
        );
    }

    #[test]
    fn test_wifi_prefix_len() {
        let mut config = WifiConfig::default();
        assert_eq!(config.prefix_len(), 24);
        config.netmask = [255, 255, 255, 255];
        assert_eq!(config.prefix_len(), 32);
        config.netmask = [0, 0, 0, 0];
        assert_eq!(config.prefix_len(), 0);
    }
}
