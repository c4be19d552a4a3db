use std::path::Path;

use rusqlite::Connection;

use super::migrations::run_migrations;

/// Settings shared by every connection to the panel store.
const CONNECTION_PRAGMAS: &str = "
    PRAGMA foreign_keys = ON;
    PRAGMA temp_store = MEMORY;
";

/// Opens the on-disk store at `path`, creating it if needed, and brings the
/// schema up to date.
pub fn init_db(path: impl AsRef<Path>) -> Result<Connection, rusqlite::Error> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;

    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    let journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    conn.execute_batch(CONNECTION_PRAGMAS)?;
    log::debug!("{} opened in {} mode", path.display(), journal_mode);

    run_migrations(&conn)?;
    Ok(conn)
}

/// Fully migrated private database, for tests and dry runs.
pub fn init_in_memory() -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(CONNECTION_PRAGMAS)?;
    run_migrations(&conn)?;
    Ok(conn)
}
