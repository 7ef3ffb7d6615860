//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from an optional config file and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub events: EventsConfig,
}

/// Which persistence gateway backs the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding one JSON document per key (file backend)
    pub data_dir: String,
    /// Redis connection string (redis backend)
    pub redis_url: String,
    /// Prefix prepended to every stored key
    pub key_prefix: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for daily rolling log files; stdout only when unset
    pub directory: Option<String>,
    pub json: bool,
}

/// Event rules
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventsConfig {
    /// Upper bound accepted for an event's total capacity
    pub max_capacity: u32,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Values missing from both sources fall back to [`Settings::default`].
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("campushub").required(false))
            .add_source(
                config::Environment::with_prefix("CAMPUSHUB")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::CampusHubError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                data_dir: "./data".to_string(),
                redis_url: "redis://localhost:6379".to_string(),
                key_prefix: "campushub:".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                json: false,
            },
            events: EventsConfig {
                max_capacity: 10_000,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_new_falls_back_to_defaults() {
        let settings = Settings::new().expect("settings should load from defaults");
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.events.max_capacity, 10_000);
    }

    #[test]
    #[serial]
    fn test_environment_overrides_backend() {
        std::env::set_var("CAMPUSHUB_STORAGE__BACKEND", "file");
        std::env::set_var("CAMPUSHUB_STORAGE__DATA_DIR", "/tmp/campushub-test");
        let settings = Settings::new();
        std::env::remove_var("CAMPUSHUB_STORAGE__BACKEND");
        std::env::remove_var("CAMPUSHUB_STORAGE__DATA_DIR");

        let settings = settings.expect("settings should load");
        assert_eq!(settings.storage.backend, StorageBackend::File);
        assert_eq!(settings.storage.data_dir, "/tmp/campushub-test");
    }
}
