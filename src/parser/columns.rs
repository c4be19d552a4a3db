use std::collections::HashMap;

use crate::error::AppError;

/// Names accepted for the panel serial, in priority order.
pub const SERIAL_ALIASES: &[&str] = &["panel_serial", "serial"];

/// Names accepted for the creation timestamp, in priority order.
pub const CREATED_ALIASES: &[&str] = &["created_at", "created", "createdAt"];

/// Required fields and the header names accepted for each.
const REQUIRED: &[(&str, &[&str])] = &[
    ("serial", SERIAL_ALIASES),
    ("created_at", CREATED_ALIASES),
];

/// Maps column names to their index in a CSV record.
pub struct ColumnMap {
    indices: HashMap<String, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// Build a ColumnMap from the CSV header record.
    /// Header fields are trimmed of surrounding whitespace.
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut indices = HashMap::new();
        let mut header_list = Vec::new();
        for (i, field) in headers.iter().enumerate() {
            let name = field.trim().to_string();
            indices.entry(name.clone()).or_insert(i);
            header_list.push(name);
        }
        ColumnMap {
            indices,
            headers: header_list,
        }
    }

    /// Get the value of a named column from a record.
    pub fn get<'a>(&self, record: &'a csv::StringRecord, col: &str) -> Option<&'a str> {
        self.indices.get(col).and_then(|&i| record.get(i))
    }

    /// Returns true if the column is present in the CSV headers.
    pub fn has(&self, col: &str) -> bool {
        self.indices.contains_key(col)
    }

    /// All header names in order.
    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }
}

/// Result of column validation: which header backs each required field.
#[derive(Debug)]
pub struct ColumnValidation {
    /// All column names present in the CSV.
    pub present: Vec<String>,
    pub serial_column: String,
    pub created_column: String,
}

fn resolve(col_map: &ColumnMap, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find(|&&a| col_map.has(a))
        .map(|a| a.to_string())
}

/// Validate that every required field has a column.
/// Returns `AppError::MissingColumns` naming each field that has none.
pub fn validate_columns(col_map: &ColumnMap) -> Result<ColumnValidation, AppError> {
    let resolved: Vec<(&str, Option<String>)> = REQUIRED
        .iter()
        .map(|(field, aliases)| (*field, resolve(col_map, aliases)))
        .collect();

    let missing: Vec<String> = resolved
        .iter()
        .filter(|(_, col)| col.is_none())
        .map(|(field, _)| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingColumns(missing));
    }

    let mut columns = resolved.into_iter().map(|(_, col)| col.unwrap_or_default());

    Ok(ColumnValidation {
        present: col_map.all_headers().to_vec(),
        serial_column: columns.next().unwrap_or_default(),
        created_column: columns.next().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_headers(cols: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(cols.to_vec())
    }

    #[test]
    fn test_column_map_get() {
        let headers = make_headers(&["panel_serial", "created_at"]);
        let cm = ColumnMap::from_headers(&headers);
        let record = csv::StringRecord::from(vec!["SN-1", "2026-01-05"]);
        assert_eq!(cm.get(&record, "panel_serial"), Some("SN-1"));
        assert_eq!(cm.get(&record, "created_at"), Some("2026-01-05"));
        assert_eq!(cm.get(&record, "missing"), None);
    }

    #[test]
    fn test_validate_table_export_headers() {
        let headers = make_headers(&["id", "panel_serial", "created_at"]);
        let val = validate_columns(&ColumnMap::from_headers(&headers)).unwrap();
        assert_eq!(val.serial_column, "panel_serial");
        assert_eq!(val.created_column, "created_at");
        assert_eq!(val.present.len(), 3);
    }

    #[test]
    fn test_validate_device_api_headers() {
        let headers = make_headers(&["serial", "type_id", "createdAt"]);
        let val = validate_columns(&ColumnMap::from_headers(&headers)).unwrap();
        assert_eq!(val.serial_column, "serial");
        assert_eq!(val.created_column, "createdAt");
    }

    #[test]
    fn test_validate_missing_columns() {
        let headers = make_headers(&["id", "name"]);
        let err = validate_columns(&ColumnMap::from_headers(&headers)).unwrap_err();
        match err {
            AppError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["serial".to_string(), "created_at".to_string()]);
            }
            _ => panic!("Expected MissingColumns error"),
        }
    }

    #[test]
    fn test_column_map_trim_whitespace() {
        let headers = make_headers(&[" serial ", " created "]);
        let cm = ColumnMap::from_headers(&headers);
        assert!(cm.has("serial"));
        assert!(cm.has("created"));
    }
}
