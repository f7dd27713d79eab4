// ============================================================
// LEAD UPLOAD TEMPLATE
// ============================================================

use crate::domain::bulk_import::LEAD_FIELDS;
use crate::domain::error::Result;
use crate::infrastructure::csv::CsvWriter;

pub const TEMPLATE_FILE_NAME: &str = "leads_template.csv";

/// Column hints, in `LEAD_FIELDS` order
const FIELD_HINTS: [&str; 9] = [
    "Required: Lead title, e.g., \"New Software Project\"",
    "Required: Company name, e.g., \"Acme Corp\"",
    "Required: Deal value in numbers, e.g., \"5000\"",
    "Optional: new, contacted, qualified, proposal, negotiation, closed",
    "Required: Full name of contact person",
    "Required: Valid email address",
    "Optional: Phone number",
    "Optional: Date in YYYY-MM-DD format",
    "Optional: Additional details",
];

const SAMPLE_ROW: [&str; 9] = [
    "New Software Project",
    "Acme Corporation",
    "5000",
    "new",
    "John Smith",
    "john.smith@acme.com",
    "+1-123-456-7890",
    "2024-12-31",
    "Potential client interested in our enterprise solution",
];

const GUIDELINE_ROW: [&str; 9] = [
    "(Enter lead title)",
    "(Enter company name)",
    "(Enter number only)",
    "(Enter one of: new, contacted, qualified, proposal, negotiation, closed)",
    "(Enter full name)",
    "(Enter valid email)",
    "(Enter phone number)",
    "(Enter date as YYYY-MM-DD)",
    "(Enter description)",
];

/// Descriptive headers, a sample lead, guidelines, a blank separator, then
/// the plain field names users fill in below.
pub fn template_rows() -> Vec<Vec<String>> {
    let described = LEAD_FIELDS
        .iter()
        .zip(FIELD_HINTS)
        .map(|(field, hint)| format!("{} ({})", field, hint))
        .collect();

    vec![
        described,
        SAMPLE_ROW.iter().map(|s| s.to_string()).collect(),
        GUIDELINE_ROW.iter().map(|s| s.to_string()).collect(),
        vec![String::new(); LEAD_FIELDS.len()],
        LEAD_FIELDS.iter().map(|s| s.to_string()).collect(),
    ]
}

pub fn render_template(writer: &CsvWriter) -> Result<String> {
    writer.write_rows(template_rows())
}
