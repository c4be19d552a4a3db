use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

use crate::error::AppError;

pub struct AppState {
    pub db: Mutex<Option<Connection>>,
}

impl AppState {
    /// Opens (and migrates) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let conn = crate::db::setup::init_db(path)?;
        log::debug!("Opened panel store at {}", path.display());
        Ok(AppState {
            db: Mutex::new(Some(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, AppError> {
        let conn = crate::db::setup::init_in_memory()?;
        Ok(AppState {
            db: Mutex::new(Some(conn)),
        })
    }
}

pub trait DbAccess {
    fn db<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error>;

    fn db_mut<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Connection) -> Result<T, rusqlite::Error>;
}

impl DbAccess for AppState {
    fn db<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    {
        let guard = self
            .db
            .lock()
            .map_err(|e| AppError::Custom(format!("Mutex poisoned: {}", e)))?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| AppError::Custom("Database not initialized".into()))?;
        Ok(f(conn)?)
    }

    fn db_mut<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Connection) -> Result<T, rusqlite::Error>,
    {
        let mut guard = self
            .db
            .lock()
            .map_err(|e| AppError::Custom(format!("Mutex poisoned: {}", e)))?;
        let conn = guard
            .as_mut()
            .ok_or_else(|| AppError::Custom("Database not initialized".into()))?;
        Ok(f(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_state() {
        let state = AppState {
            db: Mutex::new(None),
        };
        let err = state.db(|conn| conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0)));
        assert!(matches!(err, Err(AppError::Custom(msg)) if msg.contains("not initialized")));
    }

    #[test]
    fn test_in_memory_state() {
        let state = AppState::in_memory().unwrap();
        let n = state
            .db(|conn| conn.query_row("SELECT COUNT(*) FROM panels", [], |r| r.get::<_, i64>(0)))
            .unwrap();
        assert_eq!(n, 0);
    }
}
