//! HTTP server settings loaded through the `config` crate

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Listen address of a service
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load from the environment
    ///
    /// # Environment Variables
    /// - `HOST`: interface to bind (default: "0.0.0.0")
    /// - `PORT`: port to bind (default: `default_port`)
    pub fn from_env(default_port: u16) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
