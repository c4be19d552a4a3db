use rusqlite::types::Type;
use rusqlite::Connection;

use crate::commands::import::ImportRecord;
use crate::parser::deserializers::parse_created_at;
use crate::parser::types::PanelRecord;

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn created_at_from_row(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> Result<chrono::DateTime<chrono::Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    parse_created_at(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid stored timestamp {:?}", raw).into(),
        )
    })
}

// ─── Public queries ──────────────────────────────────────────────────────────

/// Every stored panel, oldest first.
pub fn load_panels(conn: &Connection) -> Result<Vec<PanelRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare_cached(
        "SELECT serial, created_at FROM panels ORDER BY created_at, serial",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(PanelRecord {
            serial: row.get(0)?,
            created_at: created_at_from_row(row, 1)?,
        })
    })?;
    rows.collect()
}

pub fn panel_count(conn: &Connection) -> Result<usize, rusqlite::Error> {
    conn.query_row("SELECT COUNT(*) FROM panels", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
}

/// Imports, most recent first.
pub fn get_import_history(conn: &Connection) -> Result<Vec<ImportRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, filename, import_date, total_rows, inserted_count, duplicate_count,
                skipped_rows, date_range_from, date_range_to
         FROM imports
         ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ImportRecord {
            id: row.get(0)?,
            filename: row.get(1)?,
            import_date: row.get(2)?,
            total_rows: row.get::<_, i64>(3)? as usize,
            inserted_count: row.get::<_, i64>(4)? as usize,
            duplicate_count: row.get::<_, i64>(5)? as usize,
            skipped_rows: row.get::<_, i64>(6)? as usize,
            date_range_from: row.get(7)?,
            date_range_to: row.get(8)?,
        })
    })?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Connection {
        let conn = crate::db::setup::init_in_memory().unwrap();
        conn.execute(
            "INSERT INTO imports (id, filename, total_rows, inserted_count, duplicate_count, skipped_rows)
             VALUES (1, 'panels.csv', 3, 3, 0, 0)",
            [],
        )
        .unwrap();
        for (serial, created) in [
            ("SN-2", "2026-02-01T08:00:00.000Z"),
            ("SN-1", "2026-01-15T10:30:00.000Z"),
            ("SN-3", "2026-02-01T08:00:00.000Z"),
        ] {
            conn.execute(
                "INSERT INTO panels (serial, created_at, import_id) VALUES (?1, ?2, 1)",
                rusqlite::params![serial, created],
            )
            .unwrap();
        }
        conn
    }

    #[test]
    fn test_load_panels_sorted() {
        let conn = setup_test_db();
        let panels = load_panels(&conn).unwrap();
        let serials: Vec<&str> = panels.iter().map(|p| p.serial.as_str()).collect();
        assert_eq!(serials, vec!["SN-1", "SN-2", "SN-3"]);
        assert_eq!(panels[0].created_at.to_rfc3339(), "2026-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_load_panels_rejects_corrupt_timestamp() {
        let conn = setup_test_db();
        conn.execute(
            "INSERT INTO panels (serial, created_at) VALUES ('BAD', 'garbage')",
            [],
        )
        .unwrap();
        assert!(matches!(
            load_panels(&conn),
            Err(rusqlite::Error::FromSqlConversionFailure(1, Type::Text, _))
        ));
    }

    #[test]
    fn test_panel_count() {
        let conn = setup_test_db();
        assert_eq!(panel_count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_import_history() {
        let conn = setup_test_db();
        let history = get_import_history(&conn).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].filename, "panels.csv");
        assert_eq!(history[0].inserted_count, 3);
        assert!(history[0].date_range_from.is_none());
    }
}
