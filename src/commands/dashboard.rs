use crate::analyzer::clock::Clock;
use crate::analyzer::dashboard::{
    build_dashboard, build_series, ChartSeries, ComparisonView, DashboardOptions, DashboardView,
};
use crate::analyzer::periods::{compare_periods, PeriodCounts};
use crate::analyzer::window::{ChartRange, MetricsRange, WindowDays, WindowLength};
use crate::config::get_config_from_db;
use crate::db::queries::load_panels;
use crate::error::AppError;
use crate::parser::types::PanelRecord;
use crate::state::{AppState, DbAccess};

/// Loads the stored panels and the dashboard options from config.
fn load(state: &AppState) -> Result<(Vec<PanelRecord>, DashboardOptions), AppError> {
    state.db(|conn| {
        let panels = load_panels(conn)?;
        let config = get_config_from_db(conn)?;
        Ok((panels, DashboardOptions::from(&config)))
    })
}

/// Returns the complete dashboard as of `clock.now()`.
pub fn get_dashboard(state: &AppState, clock: &dyn Clock) -> Result<DashboardView, AppError> {
    let (panels, options) = load(state)?;
    let now = clock.now();
    log::debug!("Building dashboard over {} panels at {}", panels.len(), now);
    Ok(build_dashboard(&panels, &options, now))
}

/// Trend series for `range`, or the configured chart range when `None`.
pub fn get_series(
    state: &AppState,
    clock: &dyn Clock,
    range: Option<ChartRange>,
) -> Result<ChartSeries, AppError> {
    let (panels, mut options) = load(state)?;
    if let Some(range) = range {
        options.chart_range = range;
    }
    Ok(build_series(&panels, &options, clock.today()))
}

/// Current-vs-previous counts for `window`, or the configured metrics range
/// when `None`. Computed even when the dashboard comparison is switched off.
pub fn get_comparison(
    state: &AppState,
    clock: &dyn Clock,
    window: Option<MetricsRange>,
) -> Result<ComparisonView, AppError> {
    let (panels, options) = load(state)?;
    let window = window.unwrap_or(options.metrics_range);
    let counts = compare_periods(&panels, window.window(), clock.now());
    Ok(ComparisonView::new(window, counts))
}

/// Raw current-vs-previous counts over an arbitrary window.
pub fn get_period_counts(
    state: &AppState,
    clock: &dyn Clock,
    window: WindowDays,
) -> Result<PeriodCounts, AppError> {
    let panels = state.db(load_panels)?;
    Ok(compare_periods(&panels, window, clock.now()))
}
