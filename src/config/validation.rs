//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::Path;
use thiserror::Error;
use wschat_proto::glob;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
    #[error("admin mask is empty")]
    EmptyAdminMask,
    #[error("admin mask is malformed: {0}")]
    MalformedAdminMask(String),
    #[error("motd.file does not exist: {0}")]
    MotdFileNotFound(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    let limits = &config.limits;
    for (name, value) in [
        ("nick_len", limits.nick_len),
        ("channel_len", limits.channel_len),
        ("topic_len", limits.topic_len),
        ("message_len", limits.message_len),
        ("reason_len", limits.reason_len),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }

    for block in &config.admin {
        if block.mask.is_empty() {
            errors.push(ValidationError::EmptyAdminMask);
        } else if !glob::is_well_formed(&block.mask) {
            errors.push(ValidationError::MalformedAdminMask(block.mask.clone()));
        }
    }

    if let Some(ref path) = config.motd.file
        && !Path::new(path).exists()
    {
        errors.push(ValidationError::MotdFileNotFound(path.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
