//! Form validation
//!
//! Raw forms arrive as strings exactly as typed. Validation produces a
//! field to message mapping; a form that fails never reaches the
//! lifecycle manager.

pub mod event_form;
pub mod student_form;

pub use event_form::{validate_event_form, EventForm};
pub use student_form::validate_student_form;

use serde::Serialize;

use crate::utils::errors::{CampusHubError, Result, ValidationErrors};

/// Outcome of validating one raw form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    pub is_valid: bool,
    pub errors: std::collections::BTreeMap<String, String>,
}

impl FormValidation {
    pub fn from_errors(errors: ValidationErrors) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors: errors.into_map(),
        }
    }

    /// Convert into the engine's error type, `Ok` when the form is valid
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            return Ok(());
        }

        let mut errors = ValidationErrors::new();
        for (field, message) in self.errors {
            errors.add(&field, message);
        }
        Err(CampusHubError::Validation(errors))
    }
}
