//! Configuration module
//!
//! Handles loading and saving rpsgen configuration. Defaults reproduce the
//! canonical test setup: localhost server on port 50001, protocol version 1,
//! TTL 60, games 0x1234 and 0x1212.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::protocol::{DEFAULT_PORT, DEFAULT_TTL, PROTOCOL_VERSION};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid target address: {0}")]
    InvalidTarget(std::net::AddrParseError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where packets go
    #[serde(default)]
    pub target: TargetConfig,

    /// Header constants
    #[serde(default)]
    pub protocol: ProtocolConfig,

    /// Which games to enumerate
    #[serde(default)]
    pub matrix: MatrixConfig,

    /// Transmission pacing
    #[serde(default)]
    pub send: SendSettings,
}

/// Destination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Destination host
    #[serde(default = "default_host")]
    pub host: String,
    /// Destination UDP port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl TargetConfig {
    /// Resolve to a socket address
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(ConfigError::InvalidTarget)?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Header field constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Protocol version stamped into every packet
    #[serde(default = "default_version")]
    pub version: u8,
    /// TTL stamped into every packet
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

fn default_version() -> u8 {
    PROTOCOL_VERSION
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            ttl: default_ttl(),
        }
    }
}

/// Matrix enumeration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Game IDs to generate packets for, in order
    #[serde(default = "default_game_ids")]
    pub game_ids: Vec<u16>,
}

fn default_game_ids() -> Vec<u16> {
    vec![0x1234, 0x1212]
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            game_ids: default_game_ids(),
        }
    }
}

/// Transmission settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendSettings {
    /// Pause between datagrams in milliseconds (0 = none)
    #[serde(default)]
    pub pause_ms: u64,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default location (`rpsgen.toml` in the
    /// current directory), falling back to built-in defaults when no file
    /// exists.
    pub fn load_default() -> ConfigResult<Self> {
        Self::load_from_dir(Path::new("."))
    }

    /// Load `rpsgen.toml` from `dir`, or built-in defaults if absent.
    /// Other files in the directory are never picked up.
    pub fn load_from_dir(dir: &Path) -> ConfigResult<Self> {
        let path = dir.join("rpsgen.toml");
        if path.exists() {
            return Self::load(&path);
        }

        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config() -> String {
    let config = Config {
        send: SendSettings { pause_ms: 10 },
        ..Default::default()
    };

    toml::to_string_pretty(&config).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.target.port, DEFAULT_PORT);
        assert_eq!(config.protocol.version, 1);
        assert_eq!(config.protocol.ttl, 60);
        assert_eq!(config.matrix.game_ids, vec![0x1234, 0x1212]);
        assert_eq!(config.send.pause_ms, 0);
    }

    #[test]
    fn test_target_socket_addr() {
        let config = Config::default();
        let addr = config.target.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:50001");

        let bad = TargetConfig {
            host: "not-an-ip".to_string(),
            port: 1,
        };
        assert!(matches!(
            bad.socket_addr(),
            Err(ConfigError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let config = Config::default();
        let file = NamedTempFile::new().unwrap();

        config.save(file.path()).unwrap();

        let loaded = Config::load(file.path()).unwrap();
        assert_eq!(loaded.target.port, config.target.port);
        assert_eq!(loaded.matrix.game_ids, config.matrix.game_ids);
    }

    #[test]
    fn test_load_from_dir_only_reads_rpsgen_toml() {
        let dir = tempfile::tempdir().unwrap();

        // A stray config.toml belonging to some other tool is ignored.
        std::fs::write(dir.path().join("config.toml"), "[target]\nport = 1\n").unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.target.port, DEFAULT_PORT);

        std::fs::write(dir.path().join("rpsgen.toml"), "[target]\nport = 9000\n").unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.target.port, 9000);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[target]\nport = 9000\n").unwrap();
        assert_eq!(parsed.target.port, 9000);
        assert_eq!(parsed.target.host, "127.0.0.1");
        assert_eq!(parsed.protocol.ttl, 60);
    }

    #[test]
    fn test_sample_config() {
        let sample = generate_sample_config();
        let parsed: Config = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.send.pause_ms, 10);
        assert_eq!(parsed.target.port, DEFAULT_PORT);
    }
}
