//! Server configuration.
//!
//! Configuration is read from a JSON (`properties.json`) or YAML file before
//! the server is constructed. `ip`, `port` and `mediaDir` are required; a
//! missing or invalid value is fatal and the listener never starts.

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "MEDIASERVE_CONFIG";

/// Configuration file used when neither an argument nor the env var is set.
pub const DEFAULT_CONFIG_FILE: &str = "properties.json";

/// Default number of simultaneously served connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// Default value of the `Server` response header.
pub const DEFAULT_SERVER_NAME: &str = "VLC";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("the '{0}' property is missing or null")]
    Missing(&'static str),

    #[error("invalid ip address '{0}'")]
    InvalidIp(String),

    #[error("maxConnections must be at least 1")]
    NoConnections,
}

/// On-disk shape of the configuration. Every field is optional here so that
/// a missing key is reported by name instead of as a serde error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    ip: Option<String>,
    port: Option<u16>,
    media_dir: Option<PathBuf>,
    template: Option<PathBuf>,
    max_connections: Option<usize>,
    server_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind.
    pub ip: IpAddr,
    /// Port to bind. `0` picks an ephemeral port.
    pub port: u16,
    /// Root directory scanned for media.
    pub media_dir: PathBuf,
    /// Optional HTML template for the listing page.
    pub template: Option<PathBuf>,
    /// Capacity of the connection gate.
    pub max_connections: usize,
    /// Value of the `Server` response header.
    pub server_name: String,
}

impl Config {
    /// Creates a configuration with defaults for every optional field.
    pub fn new(ip: IpAddr, port: u16, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            ip,
            port,
            media_dir: media_dir.into(),
            template: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }

    /// Loads the configuration file named by the first CLI argument, the
    /// `MEDIASERVE_CONFIG` env var, or `properties.json`, in that order.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        Self::from_file(path)
    }

    /// Reads a config file, choosing the format from its extension.
    /// Anything that is not `.yaml`/`.yml` is parsed as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml_str(&raw)
        } else {
            Self::from_json_str(&raw)
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(raw)?;
        raw.validate()
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(raw)?;
        raw.validate()
    }

    /// Socket address the listener binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let ip = self.ip.ok_or(ConfigError::Missing("ip"))?;
        let ip: IpAddr = ip.trim().parse().map_err(|_| ConfigError::InvalidIp(ip))?;
        let port = self.port.ok_or(ConfigError::Missing("port"))?;
        let media_dir = self.media_dir.ok_or(ConfigError::Missing("mediaDir"))?;

        let max_connections = self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(ConfigError::NoConnections);
        }

        Ok(Config {
            ip,
            port,
            media_dir,
            template: self.template,
            max_connections,
            server_name: self
                .server_name
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
        })
    }
}
