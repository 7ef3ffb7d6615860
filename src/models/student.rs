//! Student and participant models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full identity record of a signed-in student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub branch: String,
    pub year: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Raw sign-in / profile form as entered by the student
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentForm {
    /// Existing id when updating a profile; generated when absent
    pub id: Option<String>,
    pub name: String,
    pub roll_number: String,
    pub branch: String,
    pub year: String,
    pub email: String,
    pub phone: String,
}

/// Redacted roster entry shown to admins
///
/// Only these fields leave the engine; everything else on [`Student`] stays
/// behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Registration id
    pub id: String,
    pub student_id: String,
    pub name: Option<String>,
    pub roll_number: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
    pub registered_at: DateTime<Utc>,
}
