//! Window length tables.
//!
//! Every user-facing range label maps to exactly one fixed day count. There is
//! no calendar-aware month or year arithmetic: "1M" is always 30 days.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Upper bound accepted by [`WindowDays::new`] (one century of days).
pub const MAX_WINDOW_DAYS: i64 = 36_525;

/// A validated window length in whole days, always in `1..=MAX_WINDOW_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WindowDays(i64);

impl WindowDays {
    pub fn new(days: i64) -> Result<Self, AppError> {
        if (1..=MAX_WINDOW_DAYS).contains(&days) {
            Ok(WindowDays(days))
        } else {
            Err(AppError::InvalidWindow(days))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// "previous 30 days", or "previous day" for a one-day window.
    pub fn comparison_label(self) -> String {
        if self.0 == 1 {
            "previous day".to_string()
        } else {
            format!("previous {} days", self.0)
        }
    }
}

impl fmt::Display for WindowDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

/// A label enumeration whose members each stand for a fixed window.
pub trait WindowLength: Copy {
    /// Short selector label ("1M").
    fn label(self) -> &'static str;

    fn days(self) -> i64;

    fn window(self) -> WindowDays {
        WindowDays(self.days())
    }

    fn comparison_label(self) -> String {
        self.window().comparison_label()
    }
}

/// Generates a range enum plus its `WindowLength`, `FromStr` and `Display`
/// impls from one `Variant => ("label", days)` table.
macro_rules! window_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => ($label:literal, $days:literal, $long:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Long selector label ("1 Month").
            pub fn long_label(self) -> &'static str {
                match self {
                    $($name::$variant => $long,)+
                }
            }
        }

        impl WindowLength for $name {
            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            fn days(self) -> i64 {
                match self {
                    $($name::$variant => $days,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|r| r.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| AppError::UnknownRange(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

window_enum! {
    /// Range selector of the trend chart.
    ChartRange {
        OneMonth => ("1M", 30, "1 Month"),
        ThreeMonths => ("3M", 90, "3 Months"),
        SixMonths => ("6M", 180, "6 Months"),
        OneYear => ("1Y", 365, "1 Year"),
        All => ("ALL", 730, "All"),
    }
}

window_enum! {
    /// "Compare to" selector of the metric cards.
    MetricsRange {
        OneDay => ("1D", 1, "1 Day"),
        OneWeek => ("1W", 7, "1 Week"),
        OneMonth => ("1M", 30, "1 Month"),
        ThreeMonths => ("3M", 90, "3 Months"),
        SixMonths => ("6M", 180, "6 Months"),
        OneYear => ("1Y", 365, "1 Year"),
    }
}

window_enum! {
    /// Comparison period selector shown next to the comparison toggle.
    ComparisonRange {
        SevenDays => ("7D", 7, "7 Days"),
        ThirtyDays => ("30D", 30, "30 Days"),
        NinetyDays => ("90D", 90, "90 Days"),
        OneYear => ("1Y", 365, "1 Year"),
    }
}

impl Default for ChartRange {
    fn default() -> Self {
        ChartRange::OneMonth
    }
}

impl Default for MetricsRange {
    fn default() -> Self {
        MetricsRange::OneMonth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_days_rejects_non_positive() {
        assert!(matches!(WindowDays::new(0), Err(AppError::InvalidWindow(0))));
        assert!(matches!(WindowDays::new(-7), Err(AppError::InvalidWindow(-7))));
        assert!(WindowDays::new(MAX_WINDOW_DAYS + 1).is_err());
        assert_eq!(WindowDays::new(10).unwrap().get(), 10);
    }

    #[test]
    fn test_chart_range_day_counts() {
        let days: Vec<i64> = ChartRange::ALL.iter().map(|r| r.days()).collect();
        assert_eq!(days, vec![30, 90, 180, 365, 730]);
    }

    #[test]
    fn test_metrics_range_day_counts() {
        let days: Vec<i64> = MetricsRange::ALL.iter().map(|r| r.days()).collect();
        assert_eq!(days, vec![1, 7, 30, 90, 180, 365]);
    }

    #[test]
    fn test_comparison_range_day_counts() {
        let days: Vec<i64> = ComparisonRange::ALL.iter().map(|r| r.days()).collect();
        assert_eq!(days, vec![7, 30, 90, 365]);
    }

    #[test]
    fn test_labels_parse_back() {
        for r in ChartRange::ALL {
            assert_eq!(r.to_string().parse::<ChartRange>().unwrap(), *r);
        }
        for r in MetricsRange::ALL {
            assert_eq!(r.to_string().parse::<MetricsRange>().unwrap(), *r);
        }
        assert_eq!("all".parse::<ChartRange>().unwrap(), ChartRange::All);
        assert_eq!(" 1w ".parse::<MetricsRange>().unwrap(), MetricsRange::OneWeek);
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(matches!(
            "2M".parse::<ChartRange>(),
            Err(AppError::UnknownRange(s)) if s == "2M"
        ));
        // "ALL" exists only on the chart selector
        assert!("ALL".parse::<MetricsRange>().is_err());
    }

    #[test]
    fn test_comparison_label() {
        assert_eq!(MetricsRange::OneMonth.comparison_label(), "previous 30 days");
        assert_eq!(MetricsRange::OneDay.comparison_label(), "previous day");
        assert_eq!(ComparisonRange::SevenDays.comparison_label(), "previous 7 days");
    }

    #[test]
    fn test_serde_uses_labels() {
        assert_eq!(serde_json::to_string(&ChartRange::All).unwrap(), "\"ALL\"");
        let r: MetricsRange = serde_json::from_str("\"3M\"").unwrap();
        assert_eq!(r, MetricsRange::ThreeMonths);
    }
}
