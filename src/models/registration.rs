//! Registration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub student_id: String,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
    /// Set when the seat is released; the record itself is kept
    #[serde(default)]
    pub removed_at: Option<DateTime<Utc>>,
}

impl Registration {
    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Active
    }

    pub fn matches(&self, event_id: &str, student_id: &str) -> bool {
        self.event_id == event_id && self.student_id == student_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[serde(alias = "registered")]
    Active,
    Removed,
}
