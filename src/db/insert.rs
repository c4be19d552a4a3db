use rusqlite::Connection;

use crate::parser::deserializers::format_created_at;
use crate::parser::types::PanelRecord;

/// Import row metadata, written alongside the panels it brought in.
#[derive(Debug, Clone, Default)]
pub struct NewImport {
    pub filename: String,
    pub file_size_bytes: i64,
    pub total_rows: usize,
    pub skipped_rows: usize,
    pub date_range_from: Option<String>,
    pub date_range_to: Option<String>,
    pub detected_columns: Vec<String>,
    pub parse_duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertCounts {
    pub inserted: usize,
    /// Serials already in the store; left untouched.
    pub duplicates: usize,
}

/// Records an import and inserts its panels in one transaction.
///
/// Panels whose serial is already stored are skipped, never overwritten, so
/// re-importing the same export is a no-op apart from the import row.
pub fn insert_import(
    conn: &mut Connection,
    import: &NewImport,
    panels: &[PanelRecord],
) -> Result<(i64, InsertCounts), rusqlite::Error> {
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO imports (
            filename, file_size_bytes, total_rows, inserted_count, duplicate_count,
            skipped_rows, date_range_from, date_range_to, detected_columns, parse_duration_ms
        ) VALUES (?1, ?2, ?3, 0, 0, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            import.filename,
            import.file_size_bytes,
            import.total_rows as i64,
            import.skipped_rows as i64,
            import.date_range_from,
            import.date_range_to,
            serde_json::to_string(&import.detected_columns).unwrap_or_else(|_| "[]".to_string()),
            import.parse_duration_ms as i64,
        ],
    )?;
    let import_id = tx.last_insert_rowid();

    let mut counts = InsertCounts::default();
    {
        let mut stmt = tx.prepare_cached(
            "INSERT OR IGNORE INTO panels (serial, created_at, import_id) VALUES (?1, ?2, ?3)",
        )?;
        for p in panels {
            let changed = stmt.execute(rusqlite::params![
                p.serial,
                format_created_at(&p.created_at),
                import_id,
            ])?;
            if changed == 0 {
                counts.duplicates += 1;
            } else {
                counts.inserted += 1;
            }
        }
    }

    tx.execute(
        "UPDATE imports SET inserted_count = ?1, duplicate_count = ?2 WHERE id = ?3",
        rusqlite::params![counts.inserted as i64, counts.duplicates as i64, import_id],
    )?;

    tx.commit()?;
    Ok((import_id, counts))
}
