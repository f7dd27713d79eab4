pub mod use_cases;

pub use use_cases::bulk_import::BulkImportUseCase;
pub use use_cases::lead_service::LeadUseCase;
pub use use_cases::row_selection::RowSelection;
