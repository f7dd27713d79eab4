//! Row validation for lead bulk upload.
//!
//! Every rule runs; errors are collected in a fixed order so the preview and
//! the post-commit summary read the same way.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::bulk_import::{present, CandidateRow, ValidationResult};
use crate::domain::lead::LeadStatus;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const COMPANY_REQUIRED: &str = "Company is required";
pub const CONTACT_NAME_REQUIRED: &str = "Contact name is required";
pub const CONTACT_EMAIL_REQUIRED: &str = "Contact email is required";
pub const INVALID_EMAIL: &str = "Invalid email format";
pub const INVALID_VALUE: &str = "Value must be a valid number";
pub const INVALID_FOLLOW_UP: &str = "Invalid next follow up date format. Use YYYY-MM-DD";

// Deliberately loose: something@something.something, no whitespace.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const NAIVE_DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn invalid_status_message() -> String {
    format!(
        "Invalid status. Must be one of: {}",
        LeadStatus::options_list()
    )
}

/// Validate one candidate row. Pure.
pub fn validate_row(row: &CandidateRow) -> ValidationResult {
    let mut errors = Vec::new();

    if is_blank(&row.title) {
        errors.push(TITLE_REQUIRED.to_string());
    }
    if is_blank(&row.company) {
        errors.push(COMPANY_REQUIRED.to_string());
    }
    if is_blank(&row.contact_name) {
        errors.push(CONTACT_NAME_REQUIRED.to_string());
    }
    if is_blank(&row.contact_email) {
        errors.push(CONTACT_EMAIL_REQUIRED.to_string());
    }

    if let Some(email) = present(&row.contact_email) {
        if !is_valid_email(email) {
            errors.push(INVALID_EMAIL.to_string());
        }
    }

    if row.value.as_deref().and_then(parse_value).is_none() {
        errors.push(INVALID_VALUE.to_string());
    }

    if let Some(status) = present(&row.status) {
        if status.parse::<LeadStatus>().is_err() {
            errors.push(invalid_status_message());
        }
    }

    if let Some(follow_up) = present(&row.next_follow_up) {
        if parse_follow_up(follow_up).is_none() {
            errors.push(INVALID_FOLLOW_UP.to_string());
        }
    }

    ValidationResult::from_errors(errors)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Finite decimal number, surrounding whitespace allowed.
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Calendar date or date-time. Values without an offset are taken as UTC.
pub fn parse_follow_up(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |v| v.trim().is_empty())
}
