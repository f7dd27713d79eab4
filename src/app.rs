use std::sync::Arc;

use tracing::info;

use crate::application::use_cases::bulk_import::BulkImportUseCase;
use crate::application::use_cases::lead_service::LeadUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::{AppConfig, ConfigService};
use crate::infrastructure::notifier::{LogNotifier, Notifier};
use crate::infrastructure::store::{InMemoryLeadRepository, LeadRepository};
use crate::interfaces::bulk_upload::BulkUploadController;
use crate::interfaces::state::AppState;
use crate::shared::clock::{Clock, SystemClock};

/// Wire the store, use cases and upload controller for `config`.
pub fn bootstrap(config: AppConfig) -> Result<AppState> {
    bootstrap_with(config, Arc::new(SystemClock), Arc::new(LogNotifier))
}

pub fn bootstrap_with(
    config: AppConfig,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
) -> Result<AppState> {
    let lead_repository: Arc<dyn LeadRepository> = if config.store.seed_fixtures {
        Arc::new(InMemoryLeadRepository::seeded(clock.clone()))
    } else {
        Arc::new(InMemoryLeadRepository::with_clock(clock.clone()))
    };

    let lead_use_case = Arc::new(LeadUseCase::new(lead_repository.clone(), clock.clone()));
    let bulk_import_use_case = Arc::new(BulkImportUseCase::new(
        lead_repository.clone(),
        clock,
        config.import.clone(),
    )?);
    let bulk_upload = Arc::new(BulkUploadController::new(
        bulk_import_use_case.clone(),
        notifier.clone(),
    ));

    Ok(AppState {
        config,
        lead_repository,
        lead_use_case,
        bulk_import_use_case,
        bulk_upload,
        notifier,
    })
}

/// Load configuration, start logging and build the application state.
pub fn run() -> Result<AppState> {
    let config = ConfigService::new().load()?;
    crate::init_tracing(&config.log_level);

    info!(
        delimiter = %config.import.delimiter,
        seed_fixtures = config.store.seed_fixtures,
        "Starting leadflow"
    );
    bootstrap(config)
}
