//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the CampusHub engine.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{CampusHubError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| CampusHubError::Config(format!("Invalid log filter: {}", e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "campushub.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CampusHubError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log admin-side event mutations
pub fn log_event_action(event_id: &str, action: &str, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        details = details,
        "Event action performed"
    );
}

/// Log student registration changes
pub fn log_registration_action(event_id: &str, student_id: &str, action: &str, remaining_seats: u32) {
    info!(
        event_id = event_id,
        student_id = student_id,
        action = action,
        remaining_seats = remaining_seats,
        "Registration action performed"
    );
}

/// Log admin actions that affect other users
pub fn log_admin_action(action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log a failed snapshot write; the mutation stays in memory
pub fn log_persistence_failure(key: &str, error: &str) {
    warn!(
        key = key,
        error = error,
        "Persistence write failed, will retry on next mutation"
    );
}

/// Log snapshot writes
pub fn log_persistence_write(key: &str, duration_ms: u64) {
    debug!(
        key = key,
        duration_ms = duration_ms,
        "Persistence write completed"
    );
}
