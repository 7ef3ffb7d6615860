//! Test data fixtures

use campus_hub::models::StudentForm;
use campus_hub::validation::EventForm;

/// A valid event form with the given title and capacity
pub fn event_form(title: &str, capacity: u32) -> EventForm {
    EventForm {
        title: title.to_string(),
        description: format!("{} for all branches", title),
        date: "2025-11-20".to_string(),
        time: "10:00".to_string(),
        venue: "Main Auditorium".to_string(),
        event_type: "Technical".to_string(),
        cover_image_url: String::new(),
        total_capacity: capacity.to_string(),
        contact_name: "Events Cell".to_string(),
        contact_email: "events@campus.edu".to_string(),
        contact_phone: String::new(),
    }
}

/// A valid sign-in form for a student with a fixed id
pub fn student_form(id: &str, name: &str) -> StudentForm {
    StudentForm {
        id: Some(id.to_string()),
        name: name.to_string(),
        roll_number: format!("21CS{}", id.to_uppercase()),
        branch: "CSE".to_string(),
        year: "3".to_string(),
        email: format!("{}@campus.edu", id),
        phone: "+91 98765 43210".to_string(),
    }
}

pub const STUDENT_A: &str = "s1";
pub const STUDENT_B: &str = "s2";
pub const STUDENT_C: &str = "s3";
