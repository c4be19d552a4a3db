use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use crate::error::AppError;
use crate::parser::columns::{validate_columns, ColumnMap};
use crate::parser::deserializers::parse_created_at;
use crate::parser::types::{PanelRaw, PanelRecord, ParseWarning};

/// Output of the parsers: normalized panels plus import metadata.
/// Used by `commands::import` to persist panels in SQLite and build `ImportResult`.
#[derive(Debug)]
pub struct ParseOutput {
    pub panels: Vec<PanelRecord>,
    pub warnings: Vec<ParseWarning>,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    /// Rows whose serial already appeared earlier in the same file.
    pub duplicate_rows: usize,
    pub detected_columns: Vec<String>,
    pub parse_duration_ms: u64,
}

/// Parse a panel export, choosing the format from the file extension
/// (`.csv` or `.json`).
/// `progress_cb(rows_processed, panels_accepted)` is called every 500 rows.
pub fn parse_file(
    path: &Path,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if extension != "csv" && extension != "json" {
        return Err(AppError::UnsupportedFormat(extension));
    }

    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    if extension == "csv" {
        parse_csv_reader(reader, progress_cb)
    } else {
        parse_json_reader(reader, progress_cb)
    }
}

/// Accumulates accepted panels, warnings and counters across rows.
struct Collector {
    panels: Vec<PanelRecord>,
    seen: HashSet<String>,
    warnings: Vec<ParseWarning>,
    skipped: usize,
    duplicates: usize,
}

impl Collector {
    fn new() -> Self {
        Collector {
            panels: Vec::new(),
            seen: HashSet::new(),
            warnings: Vec::new(),
            skipped: 0,
            duplicates: 0,
        }
    }

    fn skip(&mut self, line: usize, message: String) {
        self.warnings.push(ParseWarning { line, message });
        self.skipped += 1;
    }

    fn accept(&mut self, raw: &PanelRaw, line: usize) -> Result<(), AppError> {
        match normalize_panel(raw, line)? {
            Some(panel) => {
                if self.seen.insert(panel.serial.clone()) {
                    self.panels.push(panel);
                } else {
                    self.duplicates += 1;
                }
            }
            None => self.skip(line, "Skipping panel with missing serial or creation date".into()),
        }
        Ok(())
    }

    fn finish(
        self,
        rows: usize,
        detected_columns: Vec<String>,
        start: Instant,
    ) -> ParseOutput {
        ParseOutput {
            panels: self.panels,
            warnings: self.warnings,
            total_rows_processed: rows,
            skipped_rows: self.skipped,
            duplicate_rows: self.duplicates,
            detected_columns,
            parse_duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Turns a raw row into a record.
///
/// `Ok(None)` when the serial or the timestamp is absent; the row is skipped.
/// A timestamp that is present but unparseable is an error: dropping it would
/// silently shift every cumulative count after it.
fn normalize_panel(raw: &PanelRaw, line: usize) -> Result<Option<PanelRecord>, AppError> {
    let serial = raw.serial.as_deref().map(str::trim).unwrap_or("");
    let created = raw.created.as_deref().map(str::trim).unwrap_or("");
    if serial.is_empty() || created.is_empty() {
        return Ok(None);
    }

    let created_at = parse_created_at(created).ok_or_else(|| AppError::InvalidTimestamp {
        line,
        value: created.to_string(),
    })?;

    Ok(Some(PanelRecord {
        serial: serial.to_string(),
        created_at,
    }))
}

/// CSV parsing from any `Read` source.
/// The delimiter (`,` or `;`) is picked from the header line.
pub fn parse_csv_reader<R: Read>(
    mut reader: R,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let start = Instant::now();

    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let header_line = content.lines().next().unwrap_or("");
    if header_line.trim().is_empty() {
        return Err(AppError::EmptyFile);
    }
    let delimiter = if header_line.contains(';') && !header_line.contains(',') {
        b';'
    } else {
        b','
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    // Phase 1: validate columns
    let headers = rdr.headers()?.clone();
    let col_map = ColumnMap::from_headers(&headers);
    let col_validation = validate_columns(&col_map)?;

    // Phase 2: parse and normalise records
    let mut collector = Collector::new();
    let mut row_idx = 0usize;

    for result in rdr.records() {
        row_idx += 1;
        let line = row_idx + 1; // +1 for the header row
        if row_idx % 500 == 0 {
            progress_cb(row_idx, collector.panels.len());
        }

        match result {
            Ok(record) => {
                let raw = PanelRaw {
                    serial: col_map
                        .get(&record, &col_validation.serial_column)
                        .map(str::to_string),
                    created: col_map
                        .get(&record, &col_validation.created_column)
                        .map(str::to_string),
                };
                collector.accept(&raw, line)?;
            }
            Err(err) => collector.skip(line, err.to_string()),
        }
    }

    if row_idx == 0 {
        return Err(AppError::EmptyFile);
    }

    Ok(collector.finish(row_idx, col_validation.present, start))
}

/// JSON parsing: a top-level array of objects. Warning and error "lines" are
/// 1-based positions in the array.
pub fn parse_json_reader<R: Read>(
    reader: R,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let start = Instant::now();

    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_reader(reader)?;
    if rows.is_empty() {
        return Err(AppError::EmptyFile);
    }

    let mut collector = Collector::new();
    for (i, row) in rows.iter().enumerate() {
        let position = i + 1;
        if position % 500 == 0 {
            progress_cb(position, collector.panels.len());
        }
        collector.accept(&PanelRaw::from_json_row(row), position)?;
    }

    Ok(collector.finish(
        rows.len(),
        vec!["serial".to_string(), "created_at".to_string()],
        start,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn csv(s: &str) -> Result<ParseOutput, AppError> {
        parse_csv_reader(s.as_bytes(), |_, _| {})
    }

    fn json(s: &str) -> Result<ParseOutput, AppError> {
        parse_json_reader(s.as_bytes(), |_, _| {})
    }

    #[test]
    fn test_csv_comma() {
        let out = csv("panel_serial,created_at\nSN-1,2026-01-05T16:24:00Z\nSN-2,2026-01-06\n").unwrap();
        assert_eq!(out.panels.len(), 2);
        assert_eq!(out.total_rows_processed, 2);
        assert_eq!(out.panels[0].serial, "SN-1");
        assert_eq!(
            out.panels[0].created_at,
            Utc.with_ymd_and_hms(2026, 1, 5, 16, 24, 0).unwrap()
        );
    }

    #[test]
    fn test_csv_semicolon() {
        let out = csv("serial;created\nA;2026-01-05 08:00:00\n").unwrap();
        assert_eq!(out.panels.len(), 1);
        assert_eq!(out.detected_columns, vec!["serial", "created"]);
    }

    #[test]
    fn test_csv_missing_fields_skipped_with_warning() {
        let out = csv("serial,created\nA,2026-01-05\n,2026-01-06\nC,\n").unwrap();
        assert_eq!(out.panels.len(), 1);
        assert_eq!(out.skipped_rows, 2);
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.warnings[0].line, 3);
        assert_eq!(out.warnings[1].line, 4);
    }

    #[test]
    fn test_csv_bad_timestamp_is_an_error() {
        let err = csv("serial,created\nA,2026-01-05\nB,not-a-date\n").unwrap_err();
        match err {
            AppError::InvalidTimestamp { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("Expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_csv_in_file_duplicates() {
        let out = csv("serial,created\nA,2026-01-05\nA,2026-02-01\nB,2026-01-07\n").unwrap();
        assert_eq!(out.panels.len(), 2);
        assert_eq!(out.duplicate_rows, 1);
        // first occurrence wins
        assert_eq!(out.panels[0].created_at.date_naive().to_string(), "2026-01-05");
    }

    #[test]
    fn test_csv_empty() {
        assert!(matches!(csv(""), Err(AppError::EmptyFile)));
        assert!(matches!(csv("serial,created\n"), Err(AppError::EmptyFile)));
    }

    #[test]
    fn test_csv_missing_columns() {
        assert!(matches!(
            csv("id,name\n1,x\n"),
            Err(AppError::MissingColumns(_))
        ));
    }

    #[test]
    fn test_json_aliases() {
        let out = json(
            r#"[
                {"panel_serial": "SN-1", "created_at": "2026-01-05T16:24:00+00:00"},
                {"serial": 1042, "created": "2026-01-06"},
                {"serial": "SN-3", "createdAt": "2026-01-07T00:00:00Z", "type_id": 0}
            ]"#,
        )
        .unwrap();
        let serials: Vec<&str> = out.panels.iter().map(|p| p.serial.as_str()).collect();
        assert_eq!(serials, vec!["SN-1", "1042", "SN-3"]);
    }

    #[test]
    fn test_json_row_with_several_aliases_of_one_field() {
        let body = r#"[{"serial": "A", "panel_serial": "A", "created_at": "2026-01-01", "created": "2026-01-01"}]"#;
        let from_json = json(body).unwrap();
        let from_csv = csv("serial,panel_serial,created_at,created\nA,A,2026-01-01,2026-01-01\n").unwrap();
        assert_eq!(from_json.panels, from_csv.panels);
        assert_eq!(from_json.panels.len(), 1);
    }

    #[test]
    fn test_json_missing_data_skipped() {
        let out = json(r#"[{"serial": "A"}, {"created": "2026-01-05"}, {"serial": null, "created": "2026-01-05"}]"#)
            .unwrap();
        assert!(out.panels.is_empty());
        assert_eq!(out.skipped_rows, 3);
    }

    #[test]
    fn test_json_bad_timestamp_is_an_error() {
        let err = json(r#"[{"serial": "A", "created": "2026-02-30"}]"#).unwrap_err();
        assert!(matches!(err, AppError::InvalidTimestamp { line: 1, .. }));
    }

    #[test]
    fn test_json_empty_array() {
        assert!(matches!(json("[]"), Err(AppError::EmptyFile)));
    }

    #[test]
    fn test_progress_callback() {
        let mut body = String::from("serial,created\n");
        for i in 0..1200 {
            body.push_str(&format!("SN-{},2026-01-05\n", i));
        }
        let calls = std::cell::Cell::new(0);
        let out = parse_csv_reader(body.as_bytes(), |_, _| calls.set(calls.get() + 1)).unwrap();
        assert_eq!(out.panels.len(), 1200);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_file(Path::new("/nonexistent/panels.xml"), |_, _| {}).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(ext) if ext == "xml"));
        let err = parse_file(Path::new("/nonexistent/panels.csv"), |_, _| {}).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
