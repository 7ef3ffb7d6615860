//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::{Settings, StorageBackend};
use crate::utils::errors::{CampusHubError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;
    validate_events_config(&settings.events)?;

    Ok(())
}

/// Validate storage configuration for the selected backend
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    match config.backend {
        StorageBackend::Memory => {}
        StorageBackend::File => {
            if config.data_dir.trim().is_empty() {
                return Err(CampusHubError::Config(
                    "Data directory is required for the file backend".to_string(),
                ));
            }
        }
        StorageBackend::Redis => {
            if config.redis_url.trim().is_empty() {
                return Err(CampusHubError::Config(
                    "Redis URL is required for the redis backend".to_string(),
                ));
            }
        }
    }

    if config.key_prefix.contains(char::is_whitespace) {
        return Err(CampusHubError::Config(
            "Key prefix must not contain whitespace".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampusHubError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CampusHubError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    if let Some(directory) = &config.directory {
        if directory.trim().is_empty() {
            return Err(CampusHubError::Config(
                "Log directory must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate event rules
fn validate_events_config(config: &super::EventsConfig) -> Result<()> {
    if config.max_capacity == 0 {
        return Err(CampusHubError::Config(
            "Max capacity must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
