// ============================================================
// BULK IMPORT USE CASE
// ============================================================
// Parse uploaded lead files and commit the selected rows

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::lead_validator::{parse_follow_up, parse_value, validate_row, INVALID_VALUE};
use super::row_selection::RowSelection;
use crate::domain::bulk_import::{present, CandidateRow, CommitOutcome};
use crate::domain::csv::{CsvRow, ImportConfig};
use crate::domain::error::{AppError, Result};
use crate::domain::lead::{Contact, LeadStatus, NewLead};
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::store::LeadRepository;
use crate::shared::clock::Clock;

/// Lead bulk-upload pipeline
pub struct BulkImportUseCase {
    repository: Arc<dyn LeadRepository>,
    clock: Arc<dyn Clock>,
    config: ImportConfig,
}

impl BulkImportUseCase {
    /// Fails with `ConfigError` when the import settings are unusable.
    pub fn new(
        repository: Arc<dyn LeadRepository>,
        clock: Arc<dyn Clock>,
        config: ImportConfig,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid import config: {}", e)))?;
        Ok(Self {
            repository,
            clock,
            config,
        })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Decode an uploaded file into candidate rows
    pub fn parse_file(&self, path: &Path) -> Result<Vec<CandidateRow>> {
        let rows = CsvParser::from_config(&self.config).parse_file(path)?;
        Ok(self.to_candidates(&rows))
    }

    /// Decode CSV text into candidate rows
    pub fn parse_content(&self, content: &str) -> Result<Vec<CandidateRow>> {
        let rows = CsvParser::from_config(&self.config).parse_content(content)?;
        Ok(self.to_candidates(&rows))
    }

    fn to_candidates(&self, rows: &[CsvRow]) -> Vec<CandidateRow> {
        let decoded = rows.len();
        let candidates: Vec<CandidateRow> = rows
            .iter()
            .map(CandidateRow::from_csv_row)
            .filter(|row| !self.config.skip_incomplete_rows || row.has_identity_fields())
            .collect();

        info!(
            decoded,
            kept = candidates.len(),
            skipped = decoded - candidates.len(),
            "Parsed lead upload"
        );
        candidates
    }

    /// Commit the selected rows, one at a time, in ascending index order.
    ///
    /// An empty selection commits every row. Invalid rows and failed creates
    /// are recorded in the outcome; nothing aborts the batch.
    pub async fn commit(&self, rows: &[CandidateRow], selection: &RowSelection) -> CommitOutcome {
        let start = Instant::now();
        let working_set = working_set(rows, selection);
        let mut outcome = CommitOutcome::default();

        info!(rows = working_set.len(), "Starting lead bulk upload");

        for (position, (source_index, row)) in working_set.into_iter().enumerate() {
            let row_number = position + 1;

            let validation = validate_row(row);
            if !validation.is_valid {
                debug!(row = row_number, errors = ?validation.errors, "Row rejected by validation");
                outcome.record_failure(row_number, source_index, validation.errors);
                continue;
            }

            let payload = match build_payload(row, self.clock.now()) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(row = row_number, error = %err, "Failed to build lead payload");
                    outcome.record_failure(row_number, source_index, vec![err.message().to_string()]);
                    continue;
                }
            };

            match self.repository.create(payload).await {
                Ok(lead) => {
                    debug!(row = row_number, lead_id = %lead.id, "Row committed");
                    outcome.record_success();
                }
                Err(err) => {
                    warn!(row = row_number, error = %err, "Failed to create lead");
                    outcome.record_failure(row_number, source_index, vec![err.message().to_string()]);
                }
            }
        }

        info!(
            succeeded = outcome.success_count,
            failed = outcome.error_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Finished lead bulk upload"
        );
        outcome
    }
}

/// Rows to attempt, paired with their index in `rows`.
pub fn working_set<'a>(
    rows: &'a [CandidateRow],
    selection: &RowSelection,
) -> Vec<(usize, &'a CandidateRow)> {
    if selection.is_empty() {
        return rows.iter().enumerate().collect();
    }
    selection
        .indices()
        .filter_map(|idx| rows.get(idx).map(|row| (idx, row)))
        .collect()
}

/// Normalize a validated row into a create payload.
pub fn build_payload(row: &CandidateRow, now: DateTime<Utc>) -> Result<NewLead> {
    let value = row
        .value
        .as_deref()
        .and_then(parse_value)
        .ok_or_else(|| AppError::ValidationError(INVALID_VALUE.to_string()))?;

    let status = match present(&row.status) {
        Some(raw) => raw.parse::<LeadStatus>().map_err(AppError::ValidationError)?,
        None => LeadStatus::New,
    };

    let next_follow_up = match present(&row.next_follow_up) {
        Some(raw) => Some(parse_follow_up(raw).ok_or_else(|| {
            AppError::ValidationError(format!("Invalid next follow up date: {}", raw))
        })?),
        None => None,
    };

    Ok(NewLead {
        title: trimmed(&row.title),
        company: trimmed(&row.company),
        value,
        status,
        date: now,
        description: trimmed(&row.description),
        contact: Contact {
            name: trimmed(&row.contact_name),
            email: trimmed(&row.contact_email).to_lowercase(),
            phone: Some(trimmed(&row.contact_phone)).filter(|phone| !phone.is_empty()),
        },
        next_follow_up,
    })
}

fn trimmed(field: &Option<String>) -> String {
    field.as_deref().map(str::trim).unwrap_or_default().to_string()
}
