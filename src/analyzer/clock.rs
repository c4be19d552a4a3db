use chrono::{DateTime, NaiveDate, Utc};

/// Source of the reference instant that anchors every window computation.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A frozen instant, used by tests and by `--now` on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_is_frozen() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }
}
