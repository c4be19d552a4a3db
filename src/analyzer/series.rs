//! Time-series bucketer: cumulative record count per calendar day.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::temporal::day_range;
use super::window::WindowDays;
use super::Timestamped;

/// One chart sample. `date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Builds the cumulative series for the `window` days ending on `today`.
///
/// Produces exactly `window + 1` points, one per day from `today - window` to
/// `today` inclusive. Each point counts the records created on or before its
/// day (UTC calendar day). An empty record list yields an all-zero series.
///
/// Record days are sorted once and a cursor advances along the day sequence,
/// so the cost is `O(n log n + window)` rather than a full rescan per point.
pub fn bucket_series<R: Timestamped>(
    records: &[R],
    window: WindowDays,
    today: NaiveDate,
) -> Vec<SeriesPoint> {
    let mut record_days: Vec<NaiveDate> = records
        .iter()
        .map(|r| r.created_at().date_naive())
        .collect();
    record_days.sort_unstable();

    let start = today - Duration::days(window.get());
    let mut cursor = 0usize;

    day_range(start, today)
        .into_iter()
        .map(|date| {
            while cursor < record_days.len() && record_days[cursor] <= date {
                cursor += 1;
            }
            SeriesPoint {
                date,
                count: cursor,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_hms_opt(h, m, 0).unwrap())
    }

    fn w(days: i64) -> WindowDays {
        WindowDays::new(days).unwrap()
    }

    /// Point-by-point rescan, kept as the oracle for the cursor version.
    fn rescan<R: Timestamped>(records: &[R], window: WindowDays, today: NaiveDate) -> Vec<SeriesPoint> {
        let start = today - Duration::days(window.get());
        (0..=window.get())
            .map(|i| {
                let date = start + Duration::days(i);
                let count = records
                    .iter()
                    .filter(|r| r.created_at().date_naive() <= date)
                    .count();
                SeriesPoint { date, count }
            })
            .collect()
    }

    #[test]
    fn test_point_count_and_ordering() {
        let today = d("2026-03-01");
        let records = vec![at(d("2026-02-20"), 8, 0), at(d("2025-01-01"), 0, 0)];
        for days in [1, 7, 30, 90, 365, 730] {
            let series = bucket_series(&records, w(days), today);
            assert_eq!(series.len() as i64, days + 1);
            assert_eq!(series.first().unwrap().date, today - Duration::days(days));
            assert_eq!(series.last().unwrap().date, today);
            for pair in series.windows(2) {
                assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
            }
        }
    }

    #[test]
    fn test_counts_are_monotone() {
        let today = d("2026-03-01");
        let records: Vec<DateTime<Utc>> = (0..40)
            .map(|i| at(today - Duration::days((i * 7) % 45), (i % 24) as u32, 30))
            .collect();
        let series = bucket_series(&records, w(60), today);
        for pair in series.windows(2) {
            assert!(pair[1].count >= pair[0].count);
        }
    }

    #[test]
    fn test_empty_records_give_zero_series() {
        let records: Vec<DateTime<Utc>> = Vec::new();
        let series = bucket_series(&records, w(30), d("2026-03-01"));
        assert_eq!(series.len(), 31);
        assert!(series.iter().all(|p| p.count == 0));
    }

    #[test]
    fn test_known_buckets() {
        // Anchor day 0 = start date; records on day 5 and day 8, window 10
        let today = d("2026-01-11");
        let start = d("2026-01-01");
        let records = vec![
            at(start + Duration::days(8), 17, 45),
            at(start + Duration::days(5), 0, 0),
        ];
        let counts: Vec<usize> = bucket_series(&records, w(10), today)
            .iter()
            .map(|p| p.count)
            .collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 0, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_records_before_window_are_included_from_the_start() {
        let today = d("2026-03-01");
        let records = vec![at(d("2020-06-01"), 12, 0), at(d("2026-02-28"), 23, 59)];
        let series = bucket_series(&records, w(7), today);
        assert_eq!(series[0].count, 1);
        assert_eq!(series.last().unwrap().count, 2);
    }

    #[test]
    fn test_future_records_never_counted() {
        let today = d("2026-03-01");
        let records = vec![at(d("2026-03-02"), 0, 0), at(d("2026-03-01"), 23, 59)];
        let series = bucket_series(&records, w(1), today);
        assert_eq!(series.last().unwrap().count, 1);
    }

    #[test]
    fn test_matches_rescan_on_unsorted_input() {
        let today = d("2026-06-15");
        let records: Vec<DateTime<Utc>> = (0..200)
            .map(|i| at(today - Duration::days((i * 37) % 400 - 20), (i % 24) as u32, (i % 60) as u32))
            .collect();
        for days in [1, 30, 180, 365] {
            assert_eq!(
                bucket_series(&records, w(days), today),
                rescan(&records, w(days), today)
            );
        }
    }

    #[test]
    fn test_same_inputs_same_output() {
        let today = d("2026-03-01");
        let records = vec![at(d("2026-02-10"), 9, 0), at(d("2026-02-11"), 9, 0)];
        assert_eq!(
            bucket_series(&records, w(30), today),
            bucket_series(&records, w(30), today)
        );
    }

    #[test]
    fn test_serializes_date_as_iso_day() {
        let point = SeriesPoint {
            date: d("2026-01-05"),
            count: 3,
        };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"date":"2026-01-05","count":3}"#
        );
    }
}
