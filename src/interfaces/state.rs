use std::sync::Arc;

use crate::application::use_cases::bulk_import::BulkImportUseCase;
use crate::application::use_cases::lead_service::LeadUseCase;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::notifier::Notifier;
use crate::infrastructure::store::LeadRepository;
use crate::interfaces::bulk_upload::BulkUploadController;

/// Everything the UI layer talks to.
pub struct AppState {
    pub config: AppConfig,
    pub lead_repository: Arc<dyn LeadRepository>,
    pub lead_use_case: Arc<LeadUseCase>,
    pub bulk_import_use_case: Arc<BulkImportUseCase>,
    pub bulk_upload: Arc<BulkUploadController>,
    pub notifier: Arc<dyn Notifier>,
}
