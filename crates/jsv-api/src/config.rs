//! # Service Configuration
//!
//! Settings come from `JSV_*` environment variables with defaults; the
//! binary's command-line flags override them afterwards.
//!
//! | Variable              | Default        |
//! |-----------------------|----------------|
//! | `JSV_HOST`            | `0.0.0.0`      |
//! | `JSV_PORT`            | `8080`         |
//! | `JSV_SCHEMA_DIR`      | `json-uploads` |
//! | `JSV_LOG_FORMAT`      | `text`         |
//! | `JSV_METRICS_ENABLED` | `true`         |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::ValueEnum;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SCHEMA_DIR: &str = "json-uploads";

/// Invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory holding `<id>.json` schema files.
    pub schema_dir: PathBuf,
    pub log_format: LogFormat,
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            schema_dir: PathBuf::from(DEFAULT_SCHEMA_DIR),
            log_format: LogFormat::Text,
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("JSV_HOST") {
            config.host = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    var: "JSV_HOST",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = lookup("JSV_PORT") {
            config.port = value.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: "JSV_PORT",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = lookup("JSV_SCHEMA_DIR") {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: "JSV_SCHEMA_DIR",
                    value,
                    reason: "must not be empty".to_string(),
                });
            }
            config.schema_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup("JSV_LOG_FORMAT") {
            config.log_format = value.parse().map_err(|reason| ConfigError::InvalidValue {
                var: "JSV_LOG_FORMAT",
                value: value.clone(),
                reason,
            })?;
        }

        // Anything other than "false" leaves metrics on.
        if let Some(value) = lookup("JSV_METRICS_ENABLED") {
            config.metrics_enabled = !value.eq_ignore_ascii_case("false");
        }

        Ok(config)
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
