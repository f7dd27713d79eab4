// ============================================================
// CSV PARSER
// ============================================================
// Decode bulk-upload files into header-keyed rows

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;
use tracing::debug;

use crate::domain::csv::{CsvField, CsvRow, ImportConfig};
use crate::domain::error::AppError;

/// CSV parser with encoding fallback
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a parser from import settings
    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new()
            .with_delimiter(config.delimiter_byte())
            .with_trim(config.trim_fields)
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse a CSV file and return rows
    pub fn parse_file(&self, path: &Path) -> Result<Vec<CsvRow>, AppError> {
        let content = Self::read_with_encoding_fallback(path)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<Vec<CsvRow>, AppError> {
        // Excel likes to prepend a BOM
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(AppError::ParseError(
                "CSV file has no header row".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", line + 1, e))
            })?;

            let row = Self::parse_row(rows.len(), &headers, &record);
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        debug!(rows = rows.len(), columns = headers.len(), "Decoded CSV content");
        Ok(rows)
    }

    /// Read a file as UTF-8, falling back to Windows-1252 for legacy exports
    fn read_with_encoding_fallback(path: &Path) -> Result<String, AppError> {
        let buffer = fs::read(path).map_err(|e| {
            AppError::IoError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        match String::from_utf8(buffer) {
            Ok(content) => Ok(content),
            Err(err) => {
                let bytes = err.into_bytes();
                let (decoded, _, _) = WINDOWS_1252.decode(&bytes);
                debug!(path = %path.display(), "CSV file is not UTF-8, decoded as Windows-1252");
                Ok(decoded.into_owned())
            }
        }
    }

    /// Parse a single CSV row; missing trailing cells become empty strings
    fn parse_row(index: usize, headers: &StringRecord, record: &StringRecord) -> CsvRow {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = record.get(idx).unwrap_or("").to_string();
                CsvField::new(header.to_string(), value)
            })
            .collect();

        CsvRow::new(index, fields)
    }
}
