pub mod bulk_import;
pub mod error;
pub mod lead;
pub mod notification;
pub mod pipeline;

// CSV rows and import settings
pub mod csv;
