//! Event create/edit form validation

use serde::{Deserialize, Serialize};

use super::FormValidation;
use crate::config::EventsConfig;
use crate::models::{CreateEventRequest, UpdateEventRequest};
use crate::utils::errors::ValidationErrors;
use crate::utils::helpers::{is_valid_email, is_valid_phone, non_blank, parse_event_date, parse_event_time};

/// Raw admin event form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub event_type: String,
    pub cover_image_url: String,
    pub total_capacity: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
}

/// Validate an event form against the configured event rules
pub fn validate_event_form(form: &EventForm, rules: &EventsConfig) -> FormValidation {
    let mut errors = ValidationErrors::new();

    if form.title.trim().is_empty() {
        errors.add("title", "Title is required");
    }

    if form.date.trim().is_empty() {
        errors.add("date", "Date is required");
    } else if parse_event_date(&form.date).is_none() {
        errors.add("date", "Date must be in YYYY-MM-DD format");
    }

    if form.time.trim().is_empty() {
        errors.add("time", "Time is required");
    } else if parse_event_time(&form.time).is_none() {
        errors.add("time", "Time must be in HH:MM format");
    }

    if form.venue.trim().is_empty() {
        errors.add("venue", "Venue is required");
    }

    match form.total_capacity.trim().parse::<i64>() {
        Ok(capacity) if capacity <= 0 => {
            errors.add("totalCapacity", "Total capacity must be a number greater than 0");
        }
        Ok(capacity) if capacity > i64::from(rules.max_capacity) => {
            errors.add(
                "totalCapacity",
                format!("Total capacity cannot exceed {}", rules.max_capacity),
            );
        }
        Ok(_) => {}
        Err(_) => {
            errors.add("totalCapacity", "Total capacity must be a whole number");
        }
    }

    if let Some(email) = non_blank(&form.contact_email) {
        if !is_valid_email(&email) {
            errors.add("contactEmail", "Contact email is not valid");
        }
    }

    if let Some(phone) = non_blank(&form.contact_phone) {
        if !is_valid_phone(&phone) {
            errors.add("contactPhone", "Contact phone is not valid");
        }
    }

    FormValidation::from_errors(errors)
}

impl EventForm {
    fn capacity(&self) -> i64 {
        // Unparseable input maps to 0 so the store's own guard rejects it.
        self.total_capacity.trim().parse().unwrap_or(0)
    }

    pub fn to_create_request(&self) -> CreateEventRequest {
        CreateEventRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            venue: self.venue.trim().to_string(),
            event_type: self.event_type.trim().to_string(),
            cover_image_url: non_blank(&self.cover_image_url),
            total_capacity: self.capacity(),
            contact_name: non_blank(&self.contact_name),
            contact_email: non_blank(&self.contact_email),
            contact_phone: non_blank(&self.contact_phone),
        }
    }

    /// The edit screen resubmits the whole form, so every field is set and
    /// a blank optional field clears the stored value
    pub fn to_update_request(&self) -> UpdateEventRequest {
        let request = self.to_create_request();
        UpdateEventRequest {
            title: Some(request.title),
            description: Some(request.description),
            date: Some(request.date),
            time: Some(request.time),
            venue: Some(request.venue),
            event_type: Some(request.event_type),
            cover_image_url: Some(self.cover_image_url.trim().to_string()),
            total_capacity: Some(request.total_capacity),
            contact_name: Some(self.contact_name.trim().to_string()),
            contact_email: Some(self.contact_email.trim().to_string()),
            contact_phone: Some(self.contact_phone.trim().to_string()),
        }
    }
}
