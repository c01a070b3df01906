use crate::domain::model::GestationalInterval;
use crate::domain::ports::Clock;
use chrono::NaiveDate;

/// EDD and GA derived from a last menstrual period.
///
/// An unknown LMP is not an error: `edd` and `ga` are simply absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LmpDating {
    date: Option<NaiveDate>,
    reference_date: NaiveDate,
    edd: Option<NaiveDate>,
    ga: Option<GestationalInterval>,
}

impl LmpDating {
    /// `reference_date` falls back to the clock's date when absent.
    pub fn new(lmp: Option<NaiveDate>, reference_date: Option<NaiveDate>, clock: &impl Clock) -> Self {
        let reference_date = reference_date.unwrap_or_else(|| clock.today());
        Self::with_reference(lmp, reference_date)
    }

    pub fn with_reference(lmp: Option<NaiveDate>, reference_date: NaiveDate) -> Self {
        let Some(date) = lmp else {
            return Self {
                date: None,
                reference_date,
                edd: None,
                ga: None,
            };
        };

        let edd = date + GestationalInterval::FULL_TERM.to_duration();
        // 40w - (edd - reference) reduces to the interval elapsed since the LMP.
        let ga = GestationalInterval::FULL_TERM - GestationalInterval::between(reference_date, edd);

        Self {
            date: Some(date),
            reference_date,
            edd: Some(edd),
            ga: Some(ga),
        }
    }

    /// Re-evaluates the same LMP at another reference date.
    pub fn as_of(&self, reference_date: NaiveDate) -> Self {
        Self::with_reference(self.date, reference_date)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn edd(&self) -> Option<NaiveDate> {
        self.edd
    }

    pub fn ga(&self) -> Option<GestationalInterval> {
        self.ga
    }

    /// Days between the EDD and the reference date, unsigned.
    pub fn days_until_edd(&self) -> Option<i64> {
        self.edd.map(|edd| (edd - self.reference_date).num_days().abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::FixedClock;
    use chrono::TimeDelta;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lmp_none() {
        let lmp = LmpDating::new(None, None, &FixedClock(ymd(2016, 10, 15)));
        assert!(lmp.edd().is_none());
        assert!(lmp.ga().is_none());
        assert!(lmp.days_until_edd().is_none());
        assert_eq!(lmp.reference_date(), ymd(2016, 10, 15));
    }

    #[test]
    fn test_lmp_edd_is_280_days_later() {
        let clock = FixedClock(ymd(2016, 10, 15));
        for offset in [0, 1, 59, 280, 366] {
            let date = ymd(2016, 1, 1) + TimeDelta::days(offset);
            let lmp = LmpDating::new(Some(date), None, &clock);
            assert_eq!(lmp.edd(), Some(date + TimeDelta::days(280)));
        }
        let lmp = LmpDating::with_reference(Some(ymd(2016, 5, 14)), ymd(2016, 10, 15));
        assert_eq!(lmp.edd(), Some(ymd(2017, 2, 18)));
    }

    #[test]
    fn test_lmp_ga_counts_elapsed_weeks() {
        let reference = ymd(2016, 10, 15);
        let lmp = LmpDating::with_reference(Some(reference - TimeDelta::weeks(25)), reference);
        assert_eq!(lmp.ga(), Some(GestationalInterval::from_weeks(25)));
        assert_eq!(lmp.days_until_edd(), Some(15 * 7));
    }

    #[test]
    fn test_lmp_ga_floors_at_week_boundaries() {
        let reference = ymd(2016, 10, 15);
        let lmp = LmpDating::with_reference(Some(reference - TimeDelta::weeks(25)), reference);
        let weeks_at = |offset: i64| {
            lmp.as_of(reference + TimeDelta::days(offset))
                .ga()
                .map(|ga| ga.weeks())
        };
        assert_eq!(weeks_at(-1), Some(24));
        assert_eq!(weeks_at(0), Some(25));
        assert_eq!(weeks_at(6), Some(25));
        assert_eq!(weeks_at(7), Some(26));
    }

    #[test]
    fn test_lmp_ga_is_monotonic() {
        let date = ymd(2016, 5, 14);
        let mut previous = 0;
        for offset in 0..=280 {
            let weeks = LmpDating::with_reference(Some(date), date + TimeDelta::days(offset))
                .ga()
                .unwrap()
                .weeks();
            assert!(weeks >= previous);
            assert_eq!(weeks, offset / 7);
            previous = weeks;
        }
    }

    #[test]
    fn test_missing_reference_uses_clock() {
        let lmp = LmpDating::new(Some(ymd(2016, 5, 14)), None, &FixedClock(ymd(2016, 9, 17)));
        assert_eq!(lmp.ga(), Some(GestationalInterval::from_weeks(18)));
    }
}
