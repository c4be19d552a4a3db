use chrono::{Datelike, Duration, NaiveDate};

use super::window::ChartRange;

/// Every calendar day from `from` to `to`, both inclusive.
/// Empty when `from > to`.
pub fn day_range(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut result = Vec::new();
    let mut current = from;

    while current <= to {
        result.push(current);
        current += Duration::days(1);
    }

    result
}

/// X-axis tick label for a chart point.
/// Short ranges show "Jan 5"; one year and longer show "Jan 26".
pub fn axis_label(date: NaiveDate, range: ChartRange) -> String {
    let month = &month_name(date.month())[..3];
    match range {
        ChartRange::OneMonth | ChartRange::ThreeMonths | ChartRange::SixMonths => {
            format!("{} {}", month, date.day())
        }
        ChartRange::OneYear | ChartRange::All => {
            format!("{} {:02}", month, date.year().rem_euclid(100))
        }
    }
}

/// Tooltip label: "January 5, 2026".
pub fn tooltip_label(date: NaiveDate) -> String {
    format!("{} {}, {}", month_name(date.month()), date.day(), date.year())
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
