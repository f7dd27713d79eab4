pub mod bulk_import;
pub mod lead_service;
pub mod lead_template;
pub mod lead_validator;
pub mod row_selection;
