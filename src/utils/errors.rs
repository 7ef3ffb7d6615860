//! Error handling for CampusHub
//!
//! This module defines the error types returned by every core operation.
//! Expected failures (full events, duplicate registrations, cancelled events)
//! are ordinary variants the caller matches on; nothing here is used for
//! control flow.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Main error type for CampusHub operations
#[derive(Error, Debug)]
pub enum CampusHubError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: String },

    #[error("Event is cancelled: {event_id}")]
    EventCancelled { event_id: String },

    #[error("Event is full: {event_id}")]
    EventFull { event_id: String },

    #[error("Student {student_id} is already registered for event {event_id}")]
    DuplicateRegistration { event_id: String, student_id: String },

    #[error("Student {student_id} is not registered for event {event_id}")]
    NotRegistered { event_id: String, student_id: String },

    #[error("Capacity {requested} is below the {active} active registrations of event {event_id}")]
    CapacityViolation {
        event_id: String,
        requested: u32,
        active: usize,
    },

    #[error("Student not found: {student_id}")]
    StudentNotFound { student_id: String },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Persistence gateway errors
///
/// These never roll back an in-memory mutation; the engine logs them and
/// retries the write later.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored value for key {key} is not valid JSON: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Redis command failed for key {key}: {source}")]
    Redis {
        key: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Field name to message mapping produced by form validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field error, used by the engine for inline guards
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error for a field. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join(", "))
    }
}

/// Result type alias for CampusHub operations
pub type Result<T> = std::result::Result<T, CampusHubError>;

/// Result type alias for persistence gateway operations
pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;

impl CampusHubError {
    /// Shorthand for a single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        CampusHubError::Validation(ValidationErrors::single(field, message))
    }

    /// Check if the error is recoverable by the caller (correct input, pick
    /// another event, retry later)
    pub fn is_recoverable(&self) -> bool {
        match self {
            CampusHubError::Validation(_) => true,
            CampusHubError::EventNotFound { .. } => true,
            CampusHubError::EventCancelled { .. } => true,
            CampusHubError::EventFull { .. } => true,
            CampusHubError::DuplicateRegistration { .. } => true,
            CampusHubError::NotRegistered { .. } => true,
            CampusHubError::CapacityViolation { .. } => true,
            CampusHubError::StudentNotFound { .. } => true,
            CampusHubError::Persistence(_) => true,
            CampusHubError::Config(_) => false,
            CampusHubError::Serialization(_) => false,
            CampusHubError::Io(_) => true,
            CampusHubError::Redis(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CampusHubError::Config(_) => ErrorSeverity::Critical,
            CampusHubError::Serialization(_) => ErrorSeverity::Error,
            CampusHubError::Persistence(_) => ErrorSeverity::Warning,
            CampusHubError::Io(_) => ErrorSeverity::Error,
            CampusHubError::Redis(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Info,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
