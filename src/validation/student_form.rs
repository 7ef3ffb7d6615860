//! Student sign-in / profile form validation

use super::FormValidation;
use crate::models::StudentForm;
use crate::utils::errors::ValidationErrors;
use crate::utils::helpers::{is_valid_email, non_blank, is_valid_phone};

pub fn validate_student_form(form: &StudentForm) -> FormValidation {
    let mut errors = ValidationErrors::new();

    if form.name.trim().is_empty() {
        errors.add("name", "Name is required");
    }
    if form.roll_number.trim().is_empty() {
        errors.add("rollNumber", "Roll number is required");
    }
    if form.branch.trim().is_empty() {
        errors.add("branch", "Branch is required");
    }

    match form.year.trim().parse::<u8>() {
        Ok(year) if (1..=6).contains(&year) => {}
        _ => errors.add("year", "Year must be between 1 and 6"),
    }

    if form.email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(&form.email) {
        errors.add("email", "Email is not valid");
    }

    if let Some(phone) = non_blank(&form.phone) {
        if !is_valid_phone(&phone) {
            errors.add("phone", "Phone number is not valid");
        }
    }

    FormValidation::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_student() {
        let form = StudentForm {
            id: None,
            name: "Asha Rao".to_string(),
            roll_number: "21CS042".to_string(),
            branch: "CSE".to_string(),
            year: "3".to_string(),
            email: "asha@campus.edu".to_string(),
            phone: String::new(),
        };
        assert!(validate_student_form(&form).is_valid);
    }

    #[test]
    fn test_missing_fields() {
        let result = validate_student_form(&StudentForm::default());
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 5);
        assert!(!result.errors.contains_key("phone"));
    }

    #[test]
    fn test_year_out_of_range() {
        let form = StudentForm {
            name: "Asha".to_string(),
            roll_number: "21CS042".to_string(),
            branch: "CSE".to_string(),
            year: "9".to_string(),
            email: "asha@campus.edu".to_string(),
            ..Default::default()
        };
        let result = validate_student_form(&form);
        assert_eq!(result.errors.keys().collect::<Vec<_>>(), vec!["year"]);
    }
}
