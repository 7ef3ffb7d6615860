//! Services module
//!
//! This module contains the caller-facing services built on the engine

pub mod campus;

pub use campus::CampusHub;
