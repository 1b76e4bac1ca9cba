//! Configuration loading utilities.

use super::types::WardenConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Load configuration from embedded defaults, an optional file and the environment.
pub struct ConfigLoader {
    config_path: Option<String>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: "WARDEN".to_string(),
        }
    }

    /// Set config file path.
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Set environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration.
    ///
    /// Environment variables look like `WARDEN__SERVER__PORT=9000`.
    pub fn load(&self) -> Result<WardenConfig> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            include_str!("defaults.toml"),
            config::FileFormat::Toml,
        ));

        if let Some(path) = &self.config_path {
            if Path::new(path).exists() {
                info!(path = %path, "Loading config file");
                builder = builder.add_source(config::File::with_name(path));
            } else {
                warn!(path = %path, "Config file not found, using defaults");
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration, reading the file named by `WARDEN_CONFIG` if set.
pub fn load_config() -> Result<WardenConfig> {
    let mut loader = ConfigLoader::new();
    if let Ok(path) = std::env::var("WARDEN_CONFIG") {
        loader = loader.with_config_path(path);
    }
    loader.load()
}
