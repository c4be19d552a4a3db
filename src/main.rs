//! Command-line front end for the panel production dashboard.
//!
//! ```bash
//! panel-dashboard import panels.csv
//! panel-dashboard series --range 3M
//! panel-dashboard compare --window 1W
//! panel-dashboard --now 2026-06-30T12:00:00Z --json dashboard
//! panel-dashboard export dashboard.xlsx
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use panel_dashboard::analyzer::dashboard::{ChartSeries, DashboardView, DataSource};
use panel_dashboard::analyzer::temporal::{axis_label, tooltip_label};
use panel_dashboard::commands;
use panel_dashboard::{
    AppError, AppState, ChartRange, Clock, ComparisonRange, FixedClock, MetricsRange, PeriodCounts,
    SystemClock, WindowDays, WindowLength,
};

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Parser, Debug)]
#[command(name = "panel-dashboard", version, about, long_about = None)]
struct Cli {
    /// SQLite store holding imported panels and settings
    #[arg(long, value_name = "PATH", env = "PANEL_DASHBOARD_DB", default_value = "panel_dashboard.db", global = true)]
    db: PathBuf,

    /// Reference instant (RFC 3339) used instead of the current time
    #[arg(long, value_name = "INSTANT", value_parser = parse_instant, global = true)]
    now: Option<DateTime<Utc>>,

    /// Diagnostic output level; RUST_LOG takes precedence
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a CSV or JSON panel export
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// List previous imports
    History,
    /// Cumulative production series
    Series {
        /// Chart range: 1M, 3M, 6M, 1Y or ALL (defaults to the configured range)
        #[arg(long, value_parser = parse_label::<ChartRange>)]
        range: Option<ChartRange>,
    },
    /// Compare the latest window with the one before it
    Compare {
        /// Metrics window: 1D, 1W, 1M, 3M, 6M or 1Y (defaults to the configured range)
        #[arg(long, value_parser = parse_label::<MetricsRange>, conflicts_with_all = ["period", "days"])]
        window: Option<MetricsRange>,
        /// Comparison period: 7D, 30D, 90D or 1Y
        #[arg(long, value_parser = parse_label::<ComparisonRange>, conflicts_with = "days")]
        period: Option<ComparisonRange>,
        /// Arbitrary window length in days
        #[arg(long, value_parser = parse_days)]
        days: Option<WindowDays>,
    },
    /// Full dashboard: cards, series and comparison
    Dashboard,
    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Write the dashboard to an Excel workbook
    Export {
        #[arg(value_name = "FILE.xlsx")]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    Set {
        #[arg(long, value_parser = parse_label::<DataSource>)]
        data_source: Option<DataSource>,
        #[arg(long)]
        comparison: Option<Toggle>,
        #[arg(long, value_parser = parse_label::<ChartRange>)]
        chart_range: Option<ChartRange>,
        #[arg(long, value_parser = parse_label::<MetricsRange>)]
        metrics_range: Option<MetricsRange>,
        /// Seed of the synthetic series
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_label<T: FromStr<Err = AppError>>(s: &str) -> Result<T, String> {
    s.parse().map_err(|e: AppError| e.to_string())
}

fn parse_days(s: &str) -> Result<WindowDays, String> {
    let days: i64 = s.parse().map_err(|_| format!("not a number of days: {}", s))?;
    WindowDays::new(days).map_err(|e| e.to_string())
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 instant {:?}: {}", s, e))
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let clock: Box<dyn Clock> = match cli.now {
        Some(instant) => Box::new(FixedClock(instant)),
        None => Box::new(SystemClock),
    };
    let state = AppState::open(&cli.db)?;
    let json = cli.json;

    match cli.command {
        Command::Import { file } => {
            let result = commands::import::import_file(&state, &file)?;
            emit(json, &result, || {
                println!("Import #{} from {}", result.import_id, file.display());
                println!("  rows       {}", result.total_rows);
                println!("  inserted   {}", result.inserted_count);
                println!("  duplicates {}", result.duplicate_count);
                println!("  skipped    {}", result.skipped_rows);
                for w in &result.warnings {
                    println!("  line {}: {}", w.line, w.message);
                }
            })
        }
        Command::History => {
            let history = commands::import::get_import_history(&state)?;
            emit(json, &history, || {
                println!("{:>4}  {:<24} {:<20} {:>8} {:>8} {:>8}", "ID", "FILE", "DATE", "ROWS", "NEW", "DUPES");
                for r in &history {
                    println!(
                        "{:>4}  {:<24} {:<20} {:>8} {:>8} {:>8}",
                        r.id, r.filename, r.import_date, r.total_rows, r.inserted_count, r.duplicate_count
                    );
                }
            })
        }
        Command::Series { range } => {
            let series = commands::dashboard::get_series(&state, clock.as_ref(), range)?;
            emit(json, &series, || print_series(&series))
        }
        Command::Compare {
            window,
            period,
            days,
        } => {
            let fixed = period.map(|p| p.window()).or(days);
            match fixed {
                Some(w) => {
                    let counts = commands::dashboard::get_period_counts(&state, clock.as_ref(), w)?;
                    emit(json, &counts, || print_counts(&counts, &w.comparison_label()))
                }
                None => {
                    let view =
                        commands::dashboard::get_comparison(&state, clock.as_ref(), window)?;
                    emit(json, &view, || {
                        println!("Window: {}", view.window_label);
                        print_counts(
                            &PeriodCounts {
                                current: view.current,
                                previous: view.previous,
                            },
                            &view.comparison_label,
                        );
                    })
                }
            }
        }
        Command::Dashboard => {
            let view = commands::dashboard::get_dashboard(&state, clock.as_ref())?;
            emit(json, &view, || print_dashboard(&view))
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let config = commands::config::get_config(&state)?;
                emit(json, &config, || {
                    println!("data_source        {}", config.data_source);
                    println!("comparison_enabled {}", config.comparison_enabled);
                    println!("chart_range        {}", config.chart_range);
                    println!("metrics_range      {}", config.metrics_range);
                    println!("synthetic_seed     {}", config.synthetic_seed);
                })
            }
            ConfigAction::Set {
                data_source,
                comparison,
                chart_range,
                metrics_range,
                seed,
            } => {
                let mut config = commands::config::get_config(&state)?;
                if let Some(v) = data_source {
                    config.data_source = v;
                }
                if let Some(v) = comparison {
                    config.comparison_enabled = v == Toggle::On;
                }
                if let Some(v) = chart_range {
                    config.chart_range = v;
                }
                if let Some(v) = metrics_range {
                    config.metrics_range = v;
                }
                if let Some(v) = seed {
                    config.synthetic_seed = v;
                }
                commands::config::update_config(&state, &config)?;
                emit(json, &config, || println!("Configuration saved"))
            }
        },
        Command::Export { file } => {
            let result = commands::export::export_dashboard(&state, clock.as_ref(), &file)?;
            emit(json, &result, || {
                println!("Wrote {} ({} bytes)", result.path, result.size_bytes)
            })
        }
    }
}

/// JSON on stdout when `json` is set, otherwise the plain-text rendering.
fn emit<T: Serialize>(json: bool, value: &T, table: impl FnOnce()) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        table();
    }
    Ok(())
}

fn print_series(series: &ChartSeries) {
    println!("Range {} ({} data)", series.range.long_label(), series.source);
    for p in &series.points {
        println!(
            "{}  {:<7} {:>8}",
            p.date.format("%Y-%m-%d"),
            axis_label(p.date, series.range),
            p.count
        );
    }
}

fn print_counts(counts: &PeriodCounts, comparison_label: &str) {
    println!("  current   {}", counts.current);
    println!("  previous  {} ({})", counts.previous, comparison_label);
    println!("  change    {}", counts.formatted_change());
    println!("  trend     {}", counts.trend().label());
}

fn print_dashboard(view: &DashboardView) {
    println!(
        "Panels as of {}",
        tooltip_label(view.meta.reference_instant.date_naive())
    );
    for card in &view.cards {
        match &card.change {
            Some(change) => println!("  {:<20} {:>10}  {}", card.title, card.value, change),
            None => println!("  {:<20} {:>10}", card.title, card.value),
        }
    }
    if let Some(cmp) = &view.comparison {
        println!("Window: {} vs {}", cmp.window_label, cmp.comparison_label);
    }
    println!();
    print_series(&view.series);
}
