//! Test helpers module
//!
//! Shared setup for the integration tests: a test context owning a hub on
//! an inspectable gateway, plus ready-made forms and students.

#![allow(dead_code)]

pub mod test_context;
pub mod test_data;

pub use test_context::*;
pub use test_data::*;
