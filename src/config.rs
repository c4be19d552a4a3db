use std::str::FromStr;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::analyzer::dashboard::{DashboardOptions, DataSource};
use crate::analyzer::window::{ChartRange, MetricsRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub data_source: DataSource,
    pub comparison_enabled: bool,
    pub chart_range: ChartRange,
    pub metrics_range: MetricsRange,
    pub synthetic_seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let options = DashboardOptions::default();
        AppConfig {
            data_source: options.data_source,
            comparison_enabled: options.comparison_enabled,
            chart_range: options.chart_range,
            metrics_range: options.metrics_range,
            synthetic_seed: options.synthetic_seed,
        }
    }
}

impl From<&AppConfig> for DashboardOptions {
    fn from(config: &AppConfig) -> Self {
        DashboardOptions {
            data_source: config.data_source,
            comparison_enabled: config.comparison_enabled,
            chart_range: config.chart_range,
            metrics_range: config.metrics_range,
            synthetic_seed: config.synthetic_seed,
        }
    }
}

/// Parses a stored value, keeping `current` (and logging) when it is invalid.
fn parse_or_keep<T: FromStr>(key: &str, value: &str, current: T) -> T {
    match value.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            log::warn!("Ignoring invalid config value {}={:?}", key, value);
            current
        }
    }
}

pub fn get_config_from_db(conn: &Connection) -> Result<AppConfig, rusqlite::Error> {
    let mut stmt = conn.prepare_cached("SELECT key, value FROM config")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut config = AppConfig::default();

    for row in rows {
        let (key, value) = row?;
        match key.as_str() {
            "data_source" => config.data_source = parse_or_keep(&key, &value, config.data_source),
            "comparison_enabled" => {
                config.comparison_enabled = parse_or_keep(&key, &value, config.comparison_enabled)
            }
            "chart_range" => config.chart_range = parse_or_keep(&key, &value, config.chart_range),
            "metrics_range" => {
                config.metrics_range = parse_or_keep(&key, &value, config.metrics_range)
            }
            "synthetic_seed" => {
                config.synthetic_seed = parse_or_keep(&key, &value, config.synthetic_seed)
            }
            _ => log::debug!("Unknown config key {}", key),
        }
    }

    Ok(config)
}

pub fn update_config_in_db(conn: &Connection, config: &AppConfig) -> Result<(), rusqlite::Error> {
    let pairs: Vec<(&str, String)> = vec![
        ("data_source", config.data_source.to_string()),
        ("comparison_enabled", config.comparison_enabled.to_string()),
        ("chart_range", config.chart_range.to_string()),
        ("metrics_range", config.metrics_range.to_string()),
        ("synthetic_seed", config.synthetic_seed.to_string()),
    ];

    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO config (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
    )?;

    for (key, value) in pairs {
        stmt.execute(rusqlite::params![key, value])?;
    }

    Ok(())
}
