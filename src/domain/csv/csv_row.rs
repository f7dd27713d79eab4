// ============================================================
// CSV ROW TYPES
// ============================================================
// Header-keyed records exactly as decoded from the uploaded file

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single field in a CSV row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvField {
    /// Header name, exactly as written in the file
    pub name: String,

    /// Field value, untouched
    pub value: String,

    /// Whether the value is empty
    pub is_empty: bool,
}

impl CsvField {
    /// Create a new CSV field
    pub fn new(name: String, value: String) -> Self {
        let is_empty = value.is_empty();
        Self {
            name,
            value,
            is_empty,
        }
    }
}

/// A single decoded row in a CSV file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    /// Row index (0-based, header excluded)
    pub index: usize,

    /// All fields in header order
    pub fields: Vec<CsvField>,

    /// Header name -> value lookup
    pub field_map: HashMap<String, String>,
}

impl CsvRow {
    /// Create a new CSV row
    pub fn new(index: usize, fields: Vec<CsvField>) -> Self {
        // First occurrence wins when a header is duplicated.
        let mut field_map = HashMap::with_capacity(fields.len());
        for field in &fields {
            field_map
                .entry(field.name.clone())
                .or_insert_with(|| field.value.clone());
        }

        Self {
            index,
            fields,
            field_map,
        }
    }

    /// Look up a value by exact header name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.field_map.get(name).map(String::as_str)
    }

    /// True when every field in the row is empty
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.is_empty)
    }

    /// Header names in file order
    pub fn headers(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        let fields = pairs
            .iter()
            .map(|(k, v)| CsvField::new(k.to_string(), v.to_string()))
            .collect();
        CsvRow::new(0, fields)
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let r = row(&[("title", "Deal"), ("Company", "Acme")]);
        assert_eq!(r.get("title"), Some("Deal"));
        assert_eq!(r.get("company"), None);
        assert_eq!(r.get("Company"), Some("Acme"));
    }

    #[test]
    fn duplicate_header_keeps_first_value() {
        let r = row(&[("title", "first"), ("title", "second")]);
        assert_eq!(r.get("title"), Some("first"));
        assert_eq!(r.fields.len(), 2);
    }

    #[test]
    fn blank_detection_ignores_headers() {
        assert!(row(&[("title", ""), ("company", "")]).is_blank());
        assert!(!row(&[("title", " "), ("company", "")]).is_blank());
    }
}
