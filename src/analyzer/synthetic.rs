//! Synthetic history: a mock trend line around the current total, for
//! deployments whose record source has no usable creation timestamps yet.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::series::SeriesPoint;
use super::temporal::day_range;
use super::window::WindowDays;

/// Maximum relative deviation of a generated point from `current_count`.
pub const MAX_VARIATION: f64 = 0.1;

/// Generates `window + 1` daily points ending on `today`, each within ±10% of
/// `current_count`. The same `seed` always yields the same series.
pub fn generate_series(
    current_count: usize,
    window: WindowDays,
    today: NaiveDate,
    seed: u64,
) -> Vec<SeriesPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = today - Duration::days(window.get());

    day_range(start, today)
        .into_iter()
        .map(|date| {
            let variation: f64 = rng.gen_range(-MAX_VARIATION..MAX_VARIATION);
            let count = (current_count as f64 * (1.0 + variation)).floor().max(0.0) as usize;
            SeriesPoint { date, count }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
    }

    #[test]
    fn test_shape_matches_bucketed_series() {
        let series = generate_series(250, WindowDays::new(90).unwrap(), today(), 7);
        assert_eq!(series.len(), 91);
        assert_eq!(series.last().unwrap().date, today());
    }

    #[test]
    fn test_same_seed_same_series() {
        let w = WindowDays::new(30).unwrap();
        assert_eq!(generate_series(100, w, today(), 42), generate_series(100, w, today(), 42));
    }

    #[test]
    fn test_different_seeds_differ() {
        let w = WindowDays::new(30).unwrap();
        assert_ne!(generate_series(1000, w, today(), 1), generate_series(1000, w, today(), 2));
    }

    #[test]
    fn test_stays_within_variation() {
        let series = generate_series(1000, WindowDays::new(365).unwrap(), today(), 3);
        for p in &series {
            assert!((900..=1100).contains(&p.count), "count {} out of range", p.count);
        }
    }

    #[test]
    fn test_zero_count_stays_zero() {
        let series = generate_series(0, WindowDays::new(7).unwrap(), today(), 9);
        assert!(series.iter().all(|p| p.count == 0));
    }
}
