//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the engine.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Date format used by event records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used by event records
pub const TIME_FORMAT: &str = "%H:%M";

/// Generate a new opaque record id
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parse an event date ("YYYY-MM-DD")
pub fn parse_event_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

/// Parse an event time ("HH:MM")
pub fn parse_event_time(time: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), TIME_FORMAT).ok()
}

/// Split a combined "YYYY-MM-DD HH:MM" string into its date and time parts
pub fn split_date_time(date_time: &str) -> Option<(String, String)> {
    let mut parts = normalize_whitespace(date_time)
        .split(' ')
        .map(str::to_string)
        .collect::<Vec<_>>();

    if parts.len() != 2 {
        return None;
    }

    let time = parts.pop()?;
    let date = parts.pop()?;
    Some((date, time))
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .map(|re| re.is_match(email.trim()))
        .unwrap_or(false)
}

/// Validate phone number format (basic validation)
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
        && digits >= 10
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim a form value, mapping blank input to `None`
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
