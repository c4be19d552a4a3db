use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::{AppState, DbAccess};

pub fn get_config(state: &AppState) -> Result<AppConfig, AppError> {
    state.db(crate::config::get_config_from_db)
}

pub fn update_config(state: &AppState, config: &AppConfig) -> Result<(), AppError> {
    state.db(|conn| crate::config::update_config_in_db(conn, config))?;
    log::info!("Configuration updated");
    Ok(())
}
