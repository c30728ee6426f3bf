//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, MotdConfig)
//! - [`listen`]: WebSocket listener configuration (ListenConfig)
//! - [`limits`]: Input length limits (LimitsConfig)
//! - [`admin`]: Out-of-band admin provisioning (AdminBlock)
//! - [`validation`]: Startup sanity checks

mod admin;
mod limits;
mod listen;
mod types;
pub mod validation;

pub use admin::AdminBlock;
pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{Config, ConfigError, DEFAULT_MOTD, MotdConfig, ServerConfig};
