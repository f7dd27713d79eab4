// ============================================================
// CSV WRITER
// ============================================================
// Render row grids as CSV text

use csv::WriterBuilder;

use crate::domain::error::AppError;

/// Writes rows of string cells as CSV text
pub struct CsvWriter {
    delimiter: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Render rows; rows may differ in length
    pub fn write_rows<R, C>(&self, rows: R) -> Result<String, AppError>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_writer(Vec::new());

        for row in rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush CSV writer: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("CSV output is not UTF-8: {}", e)))
    }
}
