pub mod analyzer;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod parser;
pub mod state;

pub use analyzer::{
    bucket_series, compare_periods, ChartRange, Clock, ComparisonRange, FixedClock, MetricsRange,
    PeriodCounts, SeriesPoint, SystemClock, Timestamped, Trend, WindowDays, WindowLength,
};
pub use error::AppError;
pub use state::AppState;
