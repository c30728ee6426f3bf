//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::admin::AdminBlock;
use super::limits::LimitsConfig;
use super::listen::ListenConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server information.
    pub server: ServerConfig,
    /// WebSocket listen configuration.
    pub listen: ListenConfig,
    /// Message of the Day configuration.
    #[serde(default)]
    pub motd: MotdConfig,
    /// Input length limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Admin provisioning blocks.
    #[serde(default)]
    pub admin: Vec<AdminBlock>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name, used in logs.
    pub name: String,
    /// Prometheus metrics HTTP port (disabled when absent).
    pub metrics_port: Option<u16>,
}

pub(super) fn default_true() -> bool {
    true
}

/// Message of the Day (MOTD) configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MotdConfig {
    /// Path to a file holding the MOTD.
    pub file: Option<String>,
    /// Inline MOTD (used when `file` is not set).
    pub text: Option<String>,
}

/// MOTD used when nothing is configured.
pub const DEFAULT_MOTD: &str = "Welcome to the server !";

impl MotdConfig {
    /// Load the MOTD from file, inline text, or the built-in default.
    pub fn load(&self) -> String {
        if let Some(ref path) = self.file {
            match std::fs::read_to_string(path) {
                Ok(content) => return content.trim_end().to_string(),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to read MOTD file");
                }
            }
        }

        match self.text {
            Some(ref text) if !text.is_empty() => text.clone(),
            _ => DEFAULT_MOTD.to_string(),
        }
    }
}
