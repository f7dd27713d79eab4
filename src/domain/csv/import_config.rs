// ============================================================
// IMPORT CONFIGURATION
// ============================================================
// Decoder settings for lead bulk-upload files

use serde::{Deserialize, Serialize};

/// Configuration for CSV lead import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Field delimiter (default: ',')
    pub delimiter: char,

    /// Trim surrounding whitespace from every decoded value (default: false)
    pub trim_fields: bool,

    /// Drop rows that lack a title, company or contact email before preview
    /// (default: true)
    pub skip_incomplete_rows: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            trim_fields: false,
            skip_incomplete_rows: true,
        }
    }
}

impl ImportConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Delimiter as the single byte the decoder expects
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.delimiter.is_ascii() {
            return Err(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ));
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(format!("delimiter {:?} is not allowed", self.delimiter));
        }
        Ok(())
    }
}
