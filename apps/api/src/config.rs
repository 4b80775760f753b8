//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind (default: 0.0.0.0)
    pub bind_addr: IpAddr,

    /// HTTP port (default: 8000)
    pub port: u16,

    /// SQLite database file (default: ./inventory.db)
    pub database_path: PathBuf,

    /// Pool size (default: 5)
    pub db_max_connections: u32,

    /// Largest accepted restore upload in bytes (default: 16MB)
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            database_path: PathBuf::from("./inventory.db"),
            db_max_connections: 5,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            bind_addr: parse_or(&lookup, "STOCKROOM_BIND_ADDR", defaults.bind_addr)?,
            port: parse_or(&lookup, "STOCKROOM_PORT", defaults.port)?,
            database_path: lookup("STOCKROOM_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            db_max_connections: parse_or(
                &lookup,
                "STOCKROOM_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            max_upload_bytes: parse_or(
                &lookup,
                "STOCKROOM_MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "STOCKROOM_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        if config.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired(
                "STOCKROOM_DATABASE_PATH".to_string(),
            ));
        }

        Ok(config)
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
