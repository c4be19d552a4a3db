use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use crate::db::insert::{insert_import, NewImport};
use crate::error::AppError;
use crate::parser::deserializers::format_created_at;
use crate::state::{AppState, DbAccess};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub import_id: i64,
    pub total_rows: usize,
    pub inserted_count: usize,
    /// Serials already stored, plus repeats inside the file.
    pub duplicate_count: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<crate::parser::types::ParseWarning>,
    pub detected_columns: Vec<String>,
    pub parse_duration_ms: u64,
    pub total_duration_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub id: i64,
    pub filename: String,
    pub import_date: String,
    pub total_rows: usize,
    pub inserted_count: usize,
    pub duplicate_count: usize,
    pub skipped_rows: usize,
    pub date_range_from: Option<String>,
    pub date_range_to: Option<String>,
}

/// Imports a CSV or JSON panel export into the store.
///
/// New serials are inserted; serials already stored or repeated in the file
/// are counted as duplicates. A malformed timestamp aborts the whole import
/// before anything is written.
pub fn import_file(state: &AppState, path: &Path) -> Result<ImportResult, AppError> {
    let start = Instant::now();

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let file_size_bytes: i64 = std::fs::metadata(path)
        .map(|m| m.len() as i64)
        .unwrap_or(0);

    log::info!("Importing panels from {}", path.display());
    let parse_output = crate::parser::parse_file(path, |rows_parsed, accepted| {
        log::debug!("Parsed {} rows ({} panels accepted)", rows_parsed, accepted);
    })?;

    for warning in &parse_output.warnings {
        log::warn!("Line {}: {}", warning.line, warning.message);
    }

    let date_range_from = parse_output
        .panels
        .iter()
        .map(|p| p.created_at)
        .min()
        .map(|dt| format_created_at(&dt));
    let date_range_to = parse_output
        .panels
        .iter()
        .map(|p| p.created_at)
        .max()
        .map(|dt| format_created_at(&dt));

    let import = NewImport {
        filename,
        file_size_bytes,
        total_rows: parse_output.total_rows_processed,
        skipped_rows: parse_output.skipped_rows,
        date_range_from,
        date_range_to,
        detected_columns: parse_output.detected_columns.clone(),
        parse_duration_ms: parse_output.parse_duration_ms,
    };

    let (import_id, counts) =
        state.db_mut(|conn| insert_import(conn, &import, &parse_output.panels))?;

    let duplicate_count = counts.duplicates + parse_output.duplicate_rows;
    let stored = state.db(crate::db::queries::panel_count)?;
    log::info!(
        "Import completed: {} inserted, {} duplicates, {} skipped",
        counts.inserted,
        duplicate_count,
        parse_output.skipped_rows
    );
    log::debug!("{} panels stored", stored);

    Ok(ImportResult {
        import_id,
        total_rows: parse_output.total_rows_processed,
        inserted_count: counts.inserted,
        duplicate_count,
        skipped_rows: parse_output.skipped_rows,
        warnings: parse_output.warnings,
        detected_columns: parse_output.detected_columns,
        parse_duration_ms: parse_output.parse_duration_ms,
        total_duration_ms: start.elapsed().as_millis() as u64,
    })
}

pub fn get_import_history(state: &AppState) -> Result<Vec<ImportRecord>, AppError> {
    state.db(crate::db::queries::get_import_history)
}
