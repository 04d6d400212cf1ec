//! Input validation for student records
//!
//! Pure functions that return every violated constraint as a field error.
//! A non-empty result is a hard rejection: the store is never reached.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::models::{NewStudent, StudentUpdate};

/// A structured validation failure naming the offending field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    })
}

/// Length limits count Unicode code points, not bytes
fn check_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    max_chars: usize,
    too_long: &'static str,
) {
    if value.is_empty() {
        errors.push(FieldError::new(field, "is required"));
    } else if value.chars().count() > max_chars {
        errors.push(FieldError::new(field, too_long));
    }
}

fn check_age(errors: &mut Vec<FieldError>, age: i32) {
    if !(1..=150).contains(&age) {
        errors.push(FieldError::new("age", "must be between 1 and 150"));
    }
}

fn check_gender(errors: &mut Vec<FieldError>, gender: &str) {
    if gender != "male" && gender != "female" {
        errors.push(FieldError::new("gender", "must be 'male' or 'female'"));
    }
}

fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    if email.is_empty() {
        errors.push(FieldError::new("email", "is required"));
    } else if email.chars().count() > 100 {
        // Matches the column width, so over-long addresses are field errors
        // instead of storage failures
        errors.push(FieldError::new("email", "must be at most 100 characters"));
    } else if !email_regex().is_match(email) {
        errors.push(FieldError::new("email", "is not a valid email address"));
    }
}

/// Validate a creation payload; every business field must pass
pub fn validate_new_student(student: &NewStudent) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_text(
        &mut errors,
        "name",
        &student.name,
        100,
        "must be at most 100 characters",
    );
    check_age(&mut errors, student.age);
    check_gender(&mut errors, &student.gender);
    check_email(&mut errors, &student.email);
    check_text(
        &mut errors,
        "phone",
        &student.phone,
        20,
        "must be at most 20 characters",
    );
    check_text(
        &mut errors,
        "major",
        &student.major,
        100,
        "must be at most 100 characters",
    );
    check_text(
        &mut errors,
        "grade",
        &student.grade,
        50,
        "must be at most 50 characters",
    );

    errors
}

/// Validate an update payload; only supplied fields are checked
pub fn validate_student_update(update: &StudentUpdate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(name) = &update.name {
        check_text(&mut errors, "name", name, 100, "must be at most 100 characters");
    }
    if let Some(age) = update.age {
        check_age(&mut errors, age);
    }
    if let Some(gender) = &update.gender {
        check_gender(&mut errors, gender);
    }
    if let Some(email) = &update.email {
        check_email(&mut errors, email);
    }
    if let Some(phone) = &update.phone {
        check_text(&mut errors, "phone", phone, 20, "must be at most 20 characters");
    }
    if let Some(major) = &update.major {
        check_text(&mut errors, "major", major, 100, "must be at most 100 characters");
    }
    if let Some(grade) = &update.grade {
        check_text(&mut errors, "grade", grade, 50, "must be at most 50 characters");
    }

    errors
}
