use crate::core::lmp::LmpDating;
use crate::core::ultrasound::UltrasoundDating;
use crate::domain::model::{DatingMethod, GestationalInterval, Reconciliation};

/// Gestational age chosen from the LMP and ultrasound datings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ga {
    lmp: LmpDating,
    ultrasound: UltrasoundDating,
    result: Reconciliation<GestationalInterval>,
}

impl Ga {
    /// With `prefer_ultrasound`, the LMP is re-evaluated as of the scan date
    /// so both GAs describe the same day.
    pub fn new(lmp: &LmpDating, ultrasound: &UltrasoundDating, prefer_ultrasound: bool) -> Self {
        let reference_date = if prefer_ultrasound {
            ultrasound.date().unwrap_or(lmp.reference_date())
        } else {
            lmp.reference_date()
        };
        let lmp = lmp.as_of(reference_date);

        let by_lmp = lmp.ga().map(|ga| (ga, DatingMethod::Lmp));
        let by_ultrasound = ultrasound.ga().map(|ga| (ga, DatingMethod::Ultrasound));
        let chosen = if prefer_ultrasound {
            by_ultrasound.or(by_lmp)
        } else {
            by_lmp.or(by_ultrasound)
        };

        let result = match chosen {
            Some((ga, method)) => {
                tracing::debug!("GA {} selected by {}", ga, method);
                Reconciliation::chosen(ga, method)
            }
            None => Reconciliation::undetermined(),
        };

        Self {
            lmp,
            ultrasound: *ultrasound,
            result,
        }
    }

    pub fn ga(&self) -> Option<GestationalInterval> {
        self.result.value
    }

    pub fn method(&self) -> DatingMethod {
        self.result.method
    }

    pub fn weeks(&self) -> Option<i64> {
        self.result.value.map(|ga| ga.weeks())
    }

    pub fn result(&self) -> Reconciliation<GestationalInterval> {
        self.result
    }

    /// The LMP dating as re-evaluated for the comparison.
    pub fn lmp(&self) -> &LmpDating {
        &self.lmp
    }

    pub fn ultrasound(&self) -> &UltrasoundDating {
        &self.ultrasound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lmp_22_weeks() -> LmpDating {
        LmpDating::with_reference(Some(ymd(2016, 5, 14)), ymd(2016, 10, 15))
    }

    fn scan_19_weeks() -> UltrasoundDating {
        UltrasoundDating::new(Some(ymd(2016, 9, 17)), Some(19), None).unwrap()
    }

    #[test]
    fn test_ga_without_lmp_uses_ultrasound() {
        let lmp = LmpDating::with_reference(None, ymd(2016, 10, 15));
        let ultrasound = UltrasoundDating::new(Some(ymd(2016, 10, 15)), Some(25), None).unwrap();
        let ga = Ga::new(&lmp, &ultrasound, true);
        assert_eq!(ga.ga(), ultrasound.ga());
        assert_eq!(ga.weeks(), Some(25));
        assert_eq!(ga.method(), DatingMethod::Ultrasound);
    }

    #[test]
    fn test_ga_without_ultrasound_uses_lmp() {
        let reference = ymd(2016, 10, 15);
        let lmp = LmpDating::with_reference(
            Some(reference - TimeDelta::days(25 * 7 + 3)),
            reference,
        );
        let ga = Ga::new(&lmp, &UltrasoundDating::none(), true);
        assert_eq!(ga.weeks(), Some(25));
        assert_eq!(ga.ga(), Some(GestationalInterval::new(25, 3)));
        assert_eq!(ga.method(), DatingMethod::Lmp);
    }

    #[test]
    fn test_ga_without_either_is_none() {
        let lmp = LmpDating::with_reference(None, ymd(2016, 10, 15));
        let ga = Ga::new(&lmp, &UltrasoundDating::none(), true);
        assert_eq!(ga.ga(), None);
        assert_eq!(ga.weeks(), None);
        assert_eq!(ga.method(), DatingMethod::Undetermined);
    }

    #[test]
    fn test_ga_prefers_ultrasound_when_both_present() {
        let ga = Ga::new(&lmp_22_weeks(), &scan_19_weeks(), true);
        assert_eq!(ga.weeks(), Some(19));
        assert_eq!(ga.method(), DatingMethod::Ultrasound);
        // LMP re-evaluated as of the scan date
        assert_eq!(ga.lmp().reference_date(), ymd(2016, 9, 17));
        assert_eq!(ga.lmp().ga(), Some(GestationalInterval::from_weeks(18)));
    }

    #[test]
    fn test_ga_prefers_lmp_when_asked() {
        let ga = Ga::new(&lmp_22_weeks(), &scan_19_weeks(), false);
        assert_eq!(ga.weeks(), Some(22));
        assert_eq!(ga.method(), DatingMethod::Lmp);
        assert_eq!(ga.lmp().reference_date(), ymd(2016, 10, 15));
    }

    #[test]
    fn test_ga_prefer_lmp_falls_back_to_ultrasound() {
        let lmp = LmpDating::with_reference(None, ymd(2016, 10, 15));
        let ga = Ga::new(&lmp, &scan_19_weeks(), false);
        assert_eq!(ga.weeks(), Some(19));
        assert_eq!(ga.method(), DatingMethod::Ultrasound);
    }
}
