//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "HH:MM"
    pub time: String,
    pub venue: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub cover_image_url: Option<String>,
    pub total_capacity: u32,
    /// Projection of `total_capacity` minus active registrations. Never
    /// trusted on load.
    #[serde(default)]
    pub remaining_seats: u32,
    #[serde(default)]
    pub status: EventStatus,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }

    pub fn is_full(&self) -> bool {
        self.remaining_seats == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Postponed,
    Cancelled,
}

impl EventStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Postponed => "postponed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub event_type: String,
    pub cover_image_url: Option<String>,
    /// Signed so that non-positive input reaches the store's own guard
    pub total_capacity: i64,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Partial edit: `None` leaves a field unchanged
///
/// For the optional fields (cover image and contact details) a blank string
/// clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub event_type: Option<String>,
    pub cover_image_url: Option<String>,
    pub total_capacity: Option<i64>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl UpdateEventRequest {
    pub fn capacity(total_capacity: i64) -> Self {
        Self {
            total_capacity: Some(total_capacity),
            ..Default::default()
        }
    }
}
