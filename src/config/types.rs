//! Application configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default port for the configuration API.
pub const DEFAULT_PORT: u16 = 3000;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind (default: 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the configuration API (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests to the API (default: false).
    #[serde(default)]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: false,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the dashboard configuration files (default: ./config).
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Directory of skeleton templates. Embedded templates are used when unset.
    #[serde(default)]
    pub skeleton_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            skeleton_dir: None,
        }
    }
}

fn default_config_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config")
}

impl AppConfig {
    /// Socket address string for the HTTP server.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
