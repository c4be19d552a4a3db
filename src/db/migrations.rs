use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

/// Schema history, oldest first. `user_version` records the last one applied.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "imports, panels and config tables",
    sql: include_str!("sql/001_initial.sql"),
}];

pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    let current_version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let latest = MIGRATIONS.last().map_or(0, |m| m.version);

    if current_version > latest {
        log::warn!(
            "Store schema version {} is newer than this build ({}), leaving it untouched",
            current_version,
            latest
        );
        return Ok(());
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current_version) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
        log::info!("Applied migration {}: {}", migration.version, migration.name);
    }

    Ok(())
}
