pub mod bulk_upload;
pub mod state;

pub use bulk_upload::{BulkUploadController, PreviewRow, TemplateExport};
pub use state::AppState;
