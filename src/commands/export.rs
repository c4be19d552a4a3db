use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use crate::analyzer::clock::Clock;
use crate::error::AppError;
use crate::export::dashboard_report;
use crate::state::AppState;

use super::dashboard::get_dashboard;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub path: String,
    pub size_bytes: u64,
    pub duration_ms: u64,
}

/// Writes the current dashboard to an `.xlsx` workbook at `path`.
pub fn export_dashboard(
    state: &AppState,
    clock: &dyn Clock,
    path: &Path,
) -> Result<ExportResult, AppError> {
    let start = Instant::now();

    let view = get_dashboard(state, clock)?;
    let bytes = dashboard_report::generate_dashboard_report(&view)?;

    std::fs::write(path, &bytes)?;
    log::info!("Exported dashboard to {} ({} bytes)", path.display(), bytes.len());

    Ok(ExportResult {
        path: path.display().to_string(),
        size_bytes: bytes.len() as u64,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
