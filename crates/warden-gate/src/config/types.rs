//! Warden configuration types.

use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Bind address for the demo server.
    #[serde(default)]
    pub server: ServerBindConfig,
    /// Gate responders and decision logging.
    #[serde(default)]
    pub gate: GateConfig,
    /// Route tree settings.
    #[serde(default)]
    pub routes: RoutesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerBindConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerBindConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerBindConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Gate configuration applied by [`crate::HttpRouter::with_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Log every gate decision.
    #[serde(default = "default_true")]
    pub log_decisions: bool,
    /// Plain-text body for 401 responses. Empty body when unset.
    #[serde(default)]
    pub unauthorized_body: Option<String>,
    /// Plain-text body for 403 responses. Empty body when unset.
    #[serde(default)]
    pub forbidden_body: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            log_decisions: default_true(),
            unauthorized_body: None,
            forbidden_body: None,
        }
    }
}

/// Route tree configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Prefix every demo route is mounted under.
    #[serde(default = "default_root")]
    pub root: String,
}

fn default_root() -> String {
    "/".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self { root: default_root() }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
