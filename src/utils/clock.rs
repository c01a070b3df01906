use crate::domain::ports::Clock;
use chrono::NaiveDate;

/// Reads the processing date from the local system calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always answers the same date. Used by tests and by the
/// `--today` / `policy.evaluation_date` overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Resolves an optional override once at the call boundary.
pub fn resolve_today(evaluation_date: Option<NaiveDate>) -> FixedClock {
    match evaluation_date {
        Some(date) => FixedClock(date),
        None => FixedClock(SystemClock.today()),
    }
}
