//! Configuration for DwaarIO
//!
//! Loads configuration from a TOML file. Every field has a default, so an
//! empty file (or a file with only `[network] peer_host`) is a valid config.
//!
//! ```toml
//! [network]
//! peer_host = "192.168.1.100"
//! peer_port = 9001
//! heartbeat = "connecting"
//!
//! [actuator]
//! type = "sg90"
//! gpio_pin = 2
//!
//! [display]
//! type = "log"
//! ```

use crate::error::{Error, Result};
use crate::protocol::constants::{HEARTBEAT_CONNECTING, HEARTBEAT_READY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Longest accepted pause between loop iterations
const MAX_LOOP_DELAY_MS: u64 = 10_000;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub actuator: ActuatorConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Network configuration (single UDP peer)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Decision server host name or IP
    pub peer_host: String,
    /// Decision server UDP port
    pub peer_port: u16,
    /// Local bind address (`0.0.0.0:0` picks any free port)
    pub bind_address: String,
    /// Upper bound on a single blocking receive
    pub receive_timeout_ms: u64,
    /// Pause after each loop iteration
    pub loop_delay_ms: u64,
    /// Heartbeat literal sent every iteration
    pub heartbeat: HeartbeatMode,
}

/// Which heartbeat literal the client announces itself with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartbeatMode {
    /// `"connecting"`, understood by the plate server
    #[default]
    Connecting,
    /// `"Barrier_Ready"`
    BarrierReady,
}

impl HeartbeatMode {
    /// Literal payload for this mode
    pub fn payload(self) -> &'static str {
        match self {
            HeartbeatMode::Connecting => HEARTBEAT_CONNECTING,
            HeartbeatMode::BarrierReady => HEARTBEAT_READY,
        }
    }
}

/// Barrier actuator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ActuatorConfig {
    /// Driver type: `mock` or `sg90`
    #[serde(rename = "type")]
    pub device_type: String,
    /// GPIO line driving the servo signal (sg90)
    pub gpio_pin: u32,
    /// Simulated settle time per move (mock)
    pub settle_ms: u64,
}

/// Display configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Driver type: `log` or `mock`
    #[serde(rename = "type")]
    pub device_type: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides
    pub level: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            peer_host: "192.168.1.100".to_string(),
            peer_port: 9001,
            bind_address: "0.0.0.0:0".to_string(),
            receive_timeout_ms: 500,
            loop_delay_ms: 100,
            heartbeat: HeartbeatMode::default(),
        }
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            device_type: "mock".to_string(),
            gpio_pin: 2,
            settle_ms: 0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            device_type: "log".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl NetworkConfig {
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }

    pub fn loop_delay(&self) -> Duration {
        Duration::from_millis(self.loop_delay_ms)
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    ///
    /// # Example
    /// ```no_run
    /// use dwaar_io::config::Config;
    ///
    /// let config = Config::load("/etc/dwaario.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the session loop cannot run with
    pub fn validate(&self) -> Result<()> {
        let net = &self.network;
        if net.peer_host.trim().is_empty() {
            return Err(Error::InvalidParameter(
                "network.peer_host must not be empty".to_string(),
            ));
        }
        if net.peer_port == 0 {
            return Err(Error::InvalidParameter(
                "network.peer_port must not be 0".to_string(),
            ));
        }
        if net.receive_timeout_ms == 0 {
            return Err(Error::InvalidParameter(
                "network.receive_timeout_ms must be at least 1".to_string(),
            ));
        }
        if net.loop_delay_ms > MAX_LOOP_DELAY_MS {
            return Err(Error::InvalidParameter(format!(
                "network.loop_delay_ms {} exceeds {}",
                net.loop_delay_ms, MAX_LOOP_DELAY_MS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.network.peer_port, 9001);
        assert_eq!(config.network.bind_address, "0.0.0.0:0");
        assert_eq!(config.network.receive_timeout(), Duration::from_millis(500));
        assert_eq!(config.network.loop_delay(), Duration::from_millis(100));
        assert_eq!(config.network.heartbeat.payload(), "connecting");
        assert_eq!(config.actuator.device_type, "mock");
        assert_eq!(config.display.device_type, "log");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.network.peer_host, "192.168.1.100");
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[network]
peer_host = "10.0.0.5"
peer_port = 9100
receive_timeout_ms = 250
heartbeat = "barrier_ready"

[actuator]
type = "sg90"
gpio_pin = 17

[display]
type = "mock"

[logging]
level = "debug"
"#;

        let config = Config::parse(toml_content).unwrap();
        assert_eq!(config.network.peer_host, "10.0.0.5");
        assert_eq!(config.network.peer_port, 9100);
        assert_eq!(config.network.receive_timeout_ms, 250);
        assert_eq!(config.network.loop_delay_ms, 100);
        assert_eq!(config.network.heartbeat, HeartbeatMode::BarrierReady);
        assert_eq!(config.network.heartbeat.payload(), "Barrier_Ready");
        assert_eq!(config.actuator.device_type, "sg90");
        assert_eq!(config.actuator.gpio_pin, 17);
        assert_eq!(config.display.device_type, "mock");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_toml_serialization() {
        let toml_string = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_string.contains("[network]"));
        assert!(toml_string.contains("[actuator]"));
        assert!(toml_string.contains("heartbeat = \"connecting\""));
        assert!(toml_string.contains("type = \"mock\""));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = Config::parse("[network]\npeer_port = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let err = Config::parse("[network]\nreceive_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let err = Config::parse("[network]\nloop_delay_ms = 60000\n").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let err = Config::parse("[network]\npeer_host = \" \"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_unknown_heartbeat_mode_is_parse_error() {
        let err = Config::parse("[network]\nheartbeat = \"hello\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network]\npeer_host = \"127.0.0.1\"\npeer_port = 9555").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.network.peer_host, "127.0.0.1");
        assert_eq!(config.network.peer_port, 9555);
    }

    #[test]
    fn test_shipped_sample_config() {
        let config = Config::parse(include_str!("../dwaario.toml")).unwrap();
        assert_eq!(config.network.peer_port, 9001);
        assert_eq!(config.actuator.gpio_pin, 2);
        assert_eq!(config.display.device_type, "log");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/dwaario.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
