use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::application::use_cases::bulk_import::BulkImportUseCase;
use crate::application::use_cases::lead_template::{render_template, TEMPLATE_FILE_NAME};
use crate::application::use_cases::lead_validator::validate_row;
use crate::application::use_cases::row_selection::RowSelection;
use crate::domain::bulk_import::{CandidateRow, CommitOutcome, ValidationResult};
use crate::domain::error::{AppError, Result};
use crate::domain::notification::Notification;
use crate::infrastructure::csv::CsvWriter;
use crate::infrastructure::notifier::Notifier;

const TEMPLATE_DOWNLOADED: &str =
    "Template downloaded! Check the first rows for sample data and guidelines.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub index: usize,
    pub row: CandidateRow,
    pub validation: ValidationResult,
    pub selected: bool,
    /// Only valid rows can be ticked in the preview
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExport {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Default)]
struct UploadSession {
    rows: Vec<CandidateRow>,
    selection: RowSelection,
}

/// Upload screen state: the parsed preview, the user's selection and the
/// in-flight flag. Shared behind an `Arc`; every method takes `&self`.
pub struct BulkUploadController {
    import: Arc<BulkImportUseCase>,
    notifier: Arc<dyn Notifier>,
    session: Mutex<UploadSession>,
    uploading: AtomicBool,
}

/// Clears the in-flight flag when the upload finishes or unwinds.
struct UploadGuard<'a>(&'a AtomicBool);

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BulkUploadController {
    pub fn new(import: Arc<BulkImportUseCase>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            import,
            notifier,
            session: Mutex::new(UploadSession::default()),
            uploading: AtomicBool::new(false),
        }
    }

    fn session(&self) -> MutexGuard<'_, UploadSession> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the preview with the rows of `content` and select all of them.
    pub fn load_content(&self, content: &str) -> Result<usize> {
        let parsed = self.import.parse_content(content);
        self.replace_preview(parsed)
    }

    pub fn load_file(&self, path: &Path) -> Result<usize> {
        let parsed = self.import.parse_file(path);
        self.replace_preview(parsed)
    }

    fn replace_preview(&self, parsed: Result<Vec<CandidateRow>>) -> Result<usize> {
        // The in-flight upload clears the session when it completes
        if self.is_uploading() {
            warn!("File loaded while an upload is in flight");
            return Err(AppError::ValidationError(
                "Cannot load a new file while an upload is in progress".to_string(),
            ));
        }

        let rows = match parsed {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Failed to parse lead upload");
                self.notifier.notify(Notification::error(format!(
                    "Error parsing CSV: {}",
                    e.message()
                )));
                return Err(e);
            }
        };

        let count = rows.len();
        let mut session = self.session();
        session.rows = rows;
        session.selection.initialize(count);
        Ok(count)
    }

    pub fn preview(&self) -> Vec<PreviewRow> {
        let session = self.session();
        session
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let validation = validate_row(row);
                PreviewRow {
                    index,
                    row: row.clone(),
                    selectable: validation.is_valid,
                    selected: session.selection.contains(index),
                    validation,
                }
            })
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.session().rows.len()
    }

    /// Flip one row. Indices outside the preview are ignored.
    pub fn toggle_row(&self, index: usize) {
        let mut session = self.session();
        if index < session.rows.len() {
            session.selection.toggle(index);
        }
    }

    pub fn toggle_all(&self) {
        let mut session = self.session();
        let total = session.rows.len();
        session.selection.toggle_all(total);
    }

    pub fn selected_count(&self) -> usize {
        self.session().selection.len()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    pub fn can_upload(&self) -> bool {
        !self.is_uploading() && !self.session().selection.is_empty()
    }

    /// Commit the current selection and report the result to the user.
    ///
    /// The preview is cleared only when every attempted row was created.
    pub async fn upload(&self) -> Result<CommitOutcome> {
        if self
            .uploading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Upload requested while another is in flight");
            return Err(AppError::ValidationError(
                "An upload is already in progress".to_string(),
            ));
        }
        let _guard = UploadGuard(&self.uploading);

        let (rows, selection) = {
            let session = self.session();
            (session.rows.clone(), session.selection.clone())
        };

        let outcome = self.import.commit(&rows, &selection).await;
        self.notifier.notify(outcome.to_notification());

        if outcome.is_complete_success() {
            let mut session = self.session();
            session.rows.clear();
            session.selection.clear();
        }
        Ok(outcome)
    }

    pub fn download_template(&self) -> Result<TemplateExport> {
        let writer = CsvWriter::new().with_delimiter(self.import.config().delimiter_byte());
        let content = render_template(&writer)?;
        info!(file_name = TEMPLATE_FILE_NAME, "Lead template exported");
        self.notifier.notify(Notification::success(TEMPLATE_DOWNLOADED));
        Ok(TemplateExport {
            file_name: TEMPLATE_FILE_NAME.to_string(),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::ImportConfig;
    use crate::domain::lead::{Lead, LeadPatch, LeadQuery, NewLead};
    use crate::domain::notification::NotificationKind;
    use crate::infrastructure::notifier::ChannelNotifier;
    use crate::infrastructure::store::{InMemoryLeadRepository, LeadRepository};
    use crate::shared::clock::SystemClock;
    use async_trait::async_trait;
    use tokio::sync::{mpsc, Notify};

    const HEADER: &str = "title,company,value,status,contactName,contactEmail\n";

    fn controller_with(
        repo: Arc<dyn LeadRepository>,
    ) -> (Arc<BulkUploadController>, mpsc::UnboundedReceiver<Notification>) {
        let import = Arc::new(BulkImportUseCase::new(
            repo,
            Arc::new(SystemClock),
            ImportConfig::default(),
        )
        .unwrap());
        let (notifier, rx) = ChannelNotifier::new();
        (
            Arc::new(BulkUploadController::new(import, Arc::new(notifier))),
            rx,
        )
    }

    fn controller() -> (
        Arc<BulkUploadController>,
        Arc<InMemoryLeadRepository>,
        mpsc::UnboundedReceiver<Notification>,
    ) {
        let repo = Arc::new(InMemoryLeadRepository::new());
        let (controller, rx) = controller_with(repo.clone());
        (controller, repo, rx)
    }

    /// Blocks every create until the test opens the gate.
    #[derive(Default)]
    struct GatedRepository {
        entered: Notify,
        gate: Notify,
    }

    #[async_trait]
    impl LeadRepository for GatedRepository {
        async fn create(&self, lead: NewLead) -> Result<Lead> {
            self.entered.notify_one();
            self.gate.notified().await;
            Ok(Lead::from_new("gated".into(), lead, chrono::Utc::now()))
        }
        async fn get(&self, id: &str) -> Result<Lead> {
            Err(AppError::NotFound(id.to_string()))
        }
        async fn list(&self, _query: &LeadQuery) -> Result<Vec<Lead>> {
            Ok(Vec::new())
        }
        async fn update(&self, id: &str, _patch: LeadPatch) -> Result<Lead> {
            Err(AppError::NotFound(id.to_string()))
        }
        async fn delete(&self, id: &str) -> Result<()> {
            Err(AppError::NotFound(id.to_string()))
        }
    }

    #[test]
    fn load_selects_every_row_and_flags_invalid_ones() {
        let (controller, _, _rx) = controller();
        let content = format!(
            "{HEADER}Deal,Acme,100,new,Ann,ann@acme.com\nBad,Globex,lots,won,Bob,bob@globex.com\n"
        );

        assert_eq!(controller.load_content(&content).unwrap(), 2);
        assert_eq!(controller.selected_count(), 2);
        assert!(controller.can_upload());

        let preview = controller.preview();
        assert!(preview[0].selectable && preview[0].selected);
        assert!(!preview[1].selectable);
        assert_eq!(preview[1].validation.errors.len(), 2);
    }

    #[test]
    fn toggles_track_selection() {
        let (controller, _, _rx) = controller();
        controller
            .load_content(&format!("{HEADER}A,Acme,1,,Ann,a@acme.com\nB,Acme,2,,Bo,b@acme.com\n"))
            .unwrap();

        controller.toggle_row(0);
        assert_eq!(controller.selected_count(), 1);
        controller.toggle_row(9);
        assert_eq!(controller.selected_count(), 1);

        controller.toggle_all();
        assert_eq!(controller.selected_count(), 2);
        controller.toggle_all();
        assert_eq!(controller.selected_count(), 0);
        assert!(!controller.can_upload());
    }

    #[test]
    fn parse_failure_notifies_and_keeps_preview() {
        let (controller, _, mut rx) = controller();
        controller
            .load_content(&format!("{HEADER}A,Acme,1,,Ann,a@acme.com\n"))
            .unwrap();

        let err = controller.load_content("").unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
        assert_eq!(controller.row_count(), 1);

        let note = rx.try_recv().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
        assert!(note.message.starts_with("Error parsing CSV: "));
    }

    #[tokio::test]
    async fn successful_upload_clears_preview() {
        let (controller, repo, mut rx) = controller();
        controller
            .load_content(&format!(
                "{HEADER}A,Acme,1,,Ann,a@acme.com\nC,Acme,3,,Cy,c@acme.com\n"
            ))
            .unwrap();

        let outcome = controller.upload().await.unwrap();
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.error_count, 0);
        assert_eq!(repo.len().await, 2);
        assert_eq!(controller.row_count(), 0);
        assert_eq!(controller.selected_count(), 0);

        let note = rx.try_recv().unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(note.message, "Successfully uploaded 2 leads");
    }

    #[tokio::test]
    async fn partial_failure_keeps_preview() {
        let (controller, repo, mut rx) = controller();
        controller
            .load_content(&format!(
                "{HEADER}A,Acme,1,,Ann,a@acme.com\nB,Acme,x,,Bo,b@acme.com\n"
            ))
            .unwrap();

        let outcome = controller.upload().await.unwrap();
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.error_count, 1);
        assert_eq!(repo.len().await, 1);
        assert_eq!(controller.row_count(), 2);
        assert_eq!(controller.selected_count(), 2);

        let note = rx.try_recv().unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(note.message, "Successfully uploaded 1 leads, 1 failed");
    }

    #[tokio::test]
    async fn total_failure_keeps_preview() {
        let (controller, repo, mut rx) = controller();
        controller
            .load_content(&format!("{HEADER}A,Acme,abc,,Ann,a@acme.com\n"))
            .unwrap();

        let outcome = controller.upload().await.unwrap();
        assert_eq!(outcome.success_count, 0);
        assert!(repo.is_empty().await);
        assert_eq!(controller.row_count(), 1);
        assert_eq!(controller.selected_count(), 1);

        let note = rx.try_recv().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
        assert_eq!(
            note.message,
            "Failed to upload leads:\nRow 1: Value must be a valid number"
        );
    }

    #[tokio::test]
    async fn second_upload_is_refused_while_first_runs() {
        let repo = Arc::new(GatedRepository::default());
        let (controller, _rx) = controller_with(repo.clone());
        controller
            .load_content(&format!("{HEADER}A,Acme,1,,Ann,a@acme.com\n"))
            .unwrap();

        let running = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.upload().await })
        };
        repo.entered.notified().await;

        assert!(controller.is_uploading());
        assert!(!controller.can_upload());
        let err = controller.upload().await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        repo.gate.notify_one();
        let outcome = running.await.unwrap().unwrap();
        assert_eq!(outcome.success_count, 1);
        assert!(!controller.is_uploading());
    }

    #[tokio::test]
    async fn load_is_refused_while_upload_runs() {
        let repo = Arc::new(GatedRepository::default());
        let (controller, mut rx) = controller_with(repo.clone());
        controller
            .load_content(&format!("{HEADER}A,Acme,1,,Ann,a@acme.com\n"))
            .unwrap();

        let running = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.upload().await })
        };
        repo.entered.notified().await;

        let err = controller
            .load_content(&format!(
                "{HEADER}B,Acme,2,,Bo,b@acme.com\nC,Acme,3,,Cy,c@acme.com\n"
            ))
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(controller.row_count(), 1);

        repo.gate.notify_one();
        let outcome = running.await.unwrap().unwrap();
        assert_eq!(outcome.success_count, 1);
        assert_eq!(controller.row_count(), 0);
        assert_eq!(rx.try_recv().unwrap().kind, NotificationKind::Success);

        // Once the upload has finished, a new file loads normally.
        let loaded = controller
            .load_content(&format!(
                "{HEADER}B,Acme,2,,Bo,b@acme.com\nC,Acme,3,,Cy,c@acme.com\n"
            ))
            .unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(controller.selected_count(), 2);
    }

    #[test]
    fn template_download_notifies() {
        let (controller, _, mut rx) = controller();
        let export = controller.download_template().unwrap();
        assert_eq!(export.file_name, "leads_template.csv");
        assert_eq!(export.content.lines().count(), 5);
        assert_eq!(rx.try_recv().unwrap().message, TEMPLATE_DOWNLOADED);
    }
}
