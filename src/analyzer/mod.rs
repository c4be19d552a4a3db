pub mod clock;
pub mod dashboard;
pub mod periods;
pub mod series;
pub mod synthetic;
pub mod temporal;
pub mod window;

use chrono::{DateTime, Utc};

pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::{build_dashboard, DashboardOptions, DashboardView, DataSource};
pub use periods::{compare_periods, ChangeType, PeriodCounts, Trend};
pub use series::{bucket_series, SeriesPoint};
pub use window::{ChartRange, ComparisonRange, MetricsRange, WindowDays, WindowLength};

/// Anything carrying a creation instant. The analyzers read nothing else.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn created_at(&self) -> DateTime<Utc> {
        (**self).created_at()
    }
}

impl Timestamped for DateTime<Utc> {
    fn created_at(&self) -> DateTime<Utc> {
        *self
    }
}
