//! Period comparator: records in the current window versus the window before it.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::window::WindowDays;
use super::Timestamped;

/// Record counts of two contiguous, equal-length windows ending at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCounts {
    pub current: usize,
    pub previous: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Colour hint of a metric card change line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Positive,
    Negative,
    Neutral,
}

impl Trend {
    pub fn change_type(self) -> ChangeType {
        match self {
            Trend::Increasing => ChangeType::Positive,
            Trend::Decreasing => ChangeType::Negative,
            Trend::Stable => ChangeType::Neutral,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Increasing => "Increasing",
            Trend::Decreasing => "Decreasing",
            Trend::Stable => "Stable",
        }
    }
}

impl PeriodCounts {
    /// `|current - previous| / previous * 100`, or 0 when `previous` is 0.
    pub fn percentage_change(&self) -> f64 {
        if self.previous == 0 {
            return 0.0;
        }
        self.current.abs_diff(self.previous) as f64 / self.previous as f64 * 100.0
    }

    pub fn trend(&self) -> Trend {
        match self.current.cmp(&self.previous) {
            std::cmp::Ordering::Greater => Trend::Increasing,
            std::cmp::Ordering::Less => Trend::Decreasing,
            std::cmp::Ordering::Equal => Trend::Stable,
        }
    }

    /// "+12.3%", "-4.0%" or "0.0%".
    pub fn formatted_change(&self) -> String {
        let pct = self.percentage_change();
        match self.trend() {
            Trend::Increasing => format!("+{:.1}%", pct),
            Trend::Decreasing => format!("-{:.1}%", pct),
            Trend::Stable => format!("{:.1}%", pct),
        }
    }
}

/// Counts records in `[now - window, now]` (current) and in
/// `[now - 2*window, now - window)` (previous).
///
/// The current window is closed on both ends and the previous one is
/// half-open, so a record sitting exactly on `now - window` is counted once,
/// in `current`. Records after `now` fall in neither window.
pub fn compare_periods<R: Timestamped>(
    records: &[R],
    window: WindowDays,
    now: DateTime<Utc>,
) -> PeriodCounts {
    let current_start = now - Duration::days(window.get());
    let previous_start = now - Duration::days(2 * window.get());
    let previous_end = current_start;

    let mut counts = PeriodCounts::default();
    for record in records {
        let created = record.created_at();
        if current_start <= created && created <= now {
            counts.current += 1;
        } else if previous_start <= created && created < previous_end {
            counts.previous += 1;
        }
    }
    counts
}
