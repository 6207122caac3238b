//! Root configuration types.

use super::defaults::{default_cors_origins, default_port, default_static_dir};
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::timing::TimingConfig;
use serde::{Deserialize, Serialize};

/// Root configuration struct for the Kalakobana server.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Listening port; the `PORT` environment variable overrides this
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served as static assets at `/`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Comma-separated CORS origins, or `*` for permissive
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
            cors_origins: default_cors_origins(),
            server: ServerConfig::default(),
            timing: TimingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
