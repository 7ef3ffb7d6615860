//! Data models module
//!
//! This module contains all data structures used throughout the engine

pub mod event;
pub mod registration;
pub mod student;

// Re-export commonly used models
pub use event::{Event, EventStatus, CreateEventRequest, UpdateEventRequest};
pub use registration::{Registration, RegistrationStatus};
pub use student::{Student, StudentForm, Participant};
