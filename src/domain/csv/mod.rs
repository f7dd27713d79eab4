// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types for decoded bulk-upload files
// No I/O, no async

mod csv_row;
mod import_config;

pub use csv_row::{CsvField, CsvRow};
pub use import_config::ImportConfig;
