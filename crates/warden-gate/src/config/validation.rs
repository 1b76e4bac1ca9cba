//! Configuration validation.

use super::types::WardenConfig;
use crate::error::PathError;
use crate::route::path;
use thiserror::Error;
use warden_common_log::{LogFormat, LogLevel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),

    #[error("Invalid route root `{root}`: {source}")]
    InvalidRouteRoot {
        root: String,
        #[source]
        source: PathError,
    },
}

/// Validate configuration, collecting every problem.
pub fn validate_config(config: &WardenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    } else if config.server.socket_addr().is_err() {
        errors.push(ConfigError::InvalidBindAddress(format!(
            "{}:{}",
            config.server.host, config.server.port
        )));
    }

    if LogLevel::parse(&config.logging.level).is_none() {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
    }

    if LogFormat::parse(&config.logging.format).is_none() {
        errors.push(ConfigError::InvalidLogFormat(config.logging.format.clone()));
    }

    if let Err(source) = path::join(path::ROOT, [&config.routes.root]) {
        errors.push(ConfigError::InvalidRouteRoot {
            root: config.routes.root.clone(),
            source,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
