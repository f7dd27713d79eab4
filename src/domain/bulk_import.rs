use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::csv::CsvRow;
use super::notification::{Notification, NotificationKind};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_COMPANY: &str = "company";
pub const FIELD_VALUE: &str = "value";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_CONTACT_NAME: &str = "contactName";
pub const FIELD_CONTACT_EMAIL: &str = "contactEmail";
pub const FIELD_CONTACT_PHONE: &str = "contactPhone";
pub const FIELD_NEXT_FOLLOW_UP: &str = "nextFollowUp";
pub const FIELD_DESCRIPTION: &str = "description";

/// Column names in template order.
pub const LEAD_FIELDS: [&str; 9] = [
    FIELD_TITLE,
    FIELD_COMPANY,
    FIELD_VALUE,
    FIELD_STATUS,
    FIELD_CONTACT_NAME,
    FIELD_CONTACT_EMAIL,
    FIELD_CONTACT_PHONE,
    FIELD_NEXT_FOLLOW_UP,
    FIELD_DESCRIPTION,
];

/// One decoded, not-yet-validated record. `None` means the column was not
/// in the file; values are kept exactly as decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRow {
    pub title: Option<String>,
    pub company: Option<String>,
    pub value: Option<String>,
    pub status: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub next_follow_up: Option<String>,
    pub description: Option<String>,
    /// Columns that are not lead fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl CandidateRow {
    pub fn from_csv_row(row: &CsvRow) -> Self {
        let take = |name: &str| row.get(name).map(str::to_string);
        let extras = row
            .field_map
            .iter()
            .filter(|(name, _)| !LEAD_FIELDS.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Self {
            title: take(FIELD_TITLE),
            company: take(FIELD_COMPANY),
            value: take(FIELD_VALUE),
            status: take(FIELD_STATUS),
            contact_name: take(FIELD_CONTACT_NAME),
            contact_email: take(FIELD_CONTACT_EMAIL),
            contact_phone: take(FIELD_CONTACT_PHONE),
            next_follow_up: take(FIELD_NEXT_FOLLOW_UP),
            description: take(FIELD_DESCRIPTION),
            extras,
        }
    }

    /// Has a non-empty title, company and contact email as decoded.
    pub fn has_identity_fields(&self) -> bool {
        [&self.title, &self.company, &self.contact_email]
            .iter()
            .all(|field| present(field).is_some())
    }
}

/// The value when the field exists and is non-empty as decoded.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// 1-based position within the working set.
    pub row: usize,
    /// 0-based index into the parsed row sequence.
    pub source_index: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<RowError>,
}

impl CommitOutcome {
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, row: usize, source_index: usize, errors: Vec<String>) {
        self.error_count += 1;
        self.errors.push(RowError {
            row,
            source_index,
            errors,
        });
    }

    pub fn attempted(&self) -> usize {
        self.success_count + self.error_count
    }

    pub fn is_complete_success(&self) -> bool {
        self.success_count > 0 && self.error_count == 0
    }

    /// Summary shown to the user once the batch finishes.
    pub fn to_notification(&self) -> Notification {
        if self.success_count > 0 {
            let mut message = format!("Successfully uploaded {} leads", self.success_count);
            if self.error_count > 0 {
                message.push_str(&format!(", {} failed", self.error_count));
            }
            Notification::new(message, NotificationKind::Success)
        } else if !self.errors.is_empty() {
            let details = self
                .errors
                .iter()
                .map(|e| format!("Row {}: {}", e.row, e.errors.join(", ")))
                .collect::<Vec<_>>()
                .join("\n");
            Notification::new(
                format!("Failed to upload leads:\n{}", details),
                NotificationKind::Error,
            )
        } else {
            Notification::new("Failed to upload leads", NotificationKind::Error)
        }
    }
}
