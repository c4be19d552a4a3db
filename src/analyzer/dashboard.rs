//! Dashboard view: metric cards, trend series and period comparison for the
//! panel records currently in the store.
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::periods::{compare_periods, ChangeType, PeriodCounts, Trend};
use super::series::{bucket_series, SeriesPoint};
use super::synthetic::generate_series;
use super::window::{ChartRange, MetricsRange, WindowLength};
use super::Timestamped;
use crate::error::AppError;

// ─── Options ─────────────────────────────────────────────────────────────────

/// Where the chart series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Cumulative counts bucketed from record timestamps.
    #[default]
    Real,
    /// Seeded mock history around the current total.
    Synthetic,
}

impl FromStr for DataSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "real" => Ok(DataSource::Real),
            "synthetic" | "mock" => Ok(DataSource::Synthetic),
            _ => Err(AppError::Custom(format!("Unknown data source: {}", s))),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Real => f.write_str("real"),
            DataSource::Synthetic => f.write_str("synthetic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOptions {
    pub data_source: DataSource,
    pub comparison_enabled: bool,
    pub chart_range: ChartRange,
    pub metrics_range: MetricsRange,
    pub synthetic_seed: u64,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        DashboardOptions {
            data_source: DataSource::Real,
            comparison_enabled: true,
            chart_range: ChartRange::default(),
            metrics_range: MetricsRange::default(),
            synthetic_seed: 42,
        }
    }
}

// ─── Data Structures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub meta: DashboardMeta,
    pub cards: Vec<MetricCard>,
    pub series: ChartSeries,
    pub comparison: Option<ComparisonView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub total_panels: usize,
    pub first_created: Option<NaiveDate>,
    pub last_created: Option<NaiveDate>,
    pub reference_instant: DateTime<Utc>,
    pub computation_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    /// "+5.2%"; absent when comparison is disabled.
    pub change: Option<String>,
    pub change_type: ChangeType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub range: ChartRange,
    pub source: DataSource,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub window: MetricsRange,
    pub window_label: String,
    pub comparison_label: String,
    pub current: usize,
    pub previous: usize,
    pub percentage_change: f64,
    pub trend: Trend,
    pub change_type: ChangeType,
}

impl ComparisonView {
    pub fn new(window: MetricsRange, counts: PeriodCounts) -> Self {
        ComparisonView {
            window,
            window_label: window.long_label().to_string(),
            comparison_label: window.comparison_label(),
            current: counts.current,
            previous: counts.previous,
            percentage_change: counts.percentage_change(),
            trend: counts.trend(),
            change_type: counts.trend().change_type(),
        }
    }
}

// ─── Builder Functions ───────────────────────────────────────────────────────

/// `records` are the panels known at `now`.
fn build_meta<R: Timestamped>(records: &[R], now: DateTime<Utc>) -> DashboardMeta {
    let days = || records.iter().map(|r| r.created_at().date_naive());
    DashboardMeta {
        total_panels: records.len(),
        first_created: days().min(),
        last_created: days().max(),
        reference_instant: now,
        computation_duration_ms: 0,
    }
}

/// Chart series for `options.chart_range`, from the configured data source.
pub fn build_series<R: Timestamped>(
    records: &[R],
    options: &DashboardOptions,
    today: NaiveDate,
) -> ChartSeries {
    let window = options.chart_range.window();
    let points = match options.data_source {
        DataSource::Real => bucket_series(records, window, today),
        DataSource::Synthetic => {
            let base = records
                .iter()
                .filter(|r| r.created_at().date_naive() <= today)
                .count();
            generate_series(base, window, today, options.synthetic_seed)
        }
    };
    ChartSeries {
        range: options.chart_range,
        source: options.data_source,
        points,
    }
}

/// Card change line for `counts`, or nothing when comparison is off.
fn card_change(counts: Option<PeriodCounts>) -> (Option<String>, ChangeType) {
    match counts {
        Some(c) => (Some(c.formatted_change()), c.trend().change_type()),
        None => (None, ChangeType::Neutral),
    }
}

/// `total_to_date` counts panels created at or before the reference instant.
fn build_cards(
    total_to_date: usize,
    options: &DashboardOptions,
    counts: PeriodCounts,
) -> Vec<MetricCard> {
    let enabled = options.comparison_enabled;

    // Growth of the running total over the window: total at `now` against
    // total at the window start.
    let growth = PeriodCounts {
        current: total_to_date,
        previous: total_to_date.saturating_sub(counts.current),
    };

    let (total_change, total_type) = card_change(enabled.then_some(growth));
    let (window_change, window_type) = card_change(enabled.then_some(counts));

    vec![
        MetricCard {
            title: "Total Panels".to_string(),
            value: total_to_date.to_string(),
            change: total_change,
            change_type: total_type,
        },
        MetricCard {
            title: format!("New Panels ({})", options.metrics_range.label()),
            value: counts.current.to_string(),
            change: window_change.clone(),
            change_type: window_type,
        },
        MetricCard {
            title: "Trend".to_string(),
            value: counts.trend().label().to_string(),
            change: window_change,
            change_type: window_type,
        },
    ]
}

// ─── Main Entry Point ────────────────────────────────────────────────────────

/// Builds the complete dashboard for `records` as seen at `now`.
pub fn build_dashboard<R: Timestamped>(
    records: &[R],
    options: &DashboardOptions,
    now: DateTime<Utc>,
) -> DashboardView {
    let start = Instant::now();

    let counts = compare_periods(records, options.metrics_range.window(), now);
    let known: Vec<&R> = records.iter().filter(|r| r.created_at() <= now).collect();
    let mut meta = build_meta(&known, now);
    let series = build_series(records, options, now.date_naive());
    let cards = build_cards(known.len(), options, counts);
    let comparison = options
        .comparison_enabled
        .then(|| ComparisonView::new(options.metrics_range, counts));

    meta.computation_duration_ms = start.elapsed().as_millis() as u64;

    DashboardView {
        meta,
        cards,
        series,
        comparison,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
