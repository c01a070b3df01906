use crate::domain::model::GestationalInterval;
use crate::utils::error::{DatingError, Result};
use chrono::NaiveDate;

/// Largest gap between a recorded EDD and the one implied by the recorded GA
/// that is still treated as scanner rounding.
pub const RECORDED_EDD_TOLERANCE_DAYS: i64 = 6;

/// Ultrasound dating built from a scan date and the clinician-confirmed GA.
///
/// Without a scan date (or without a week count) every field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UltrasoundDating {
    date: Option<NaiveDate>,
    ga: Option<GestationalInterval>,
    edd: Option<NaiveDate>,
}

impl UltrasoundDating {
    pub fn none() -> Self {
        Self::default()
    }

    /// Validates the confirmed GA and derives the EDD from it.
    ///
    /// Weeks must satisfy `0 < weeks < 40` and days `0 <= days <= 6`; days default to 0.
    pub fn new(
        ultrasound_date: Option<NaiveDate>,
        ga_weeks: Option<i64>,
        ga_days: Option<i64>,
    ) -> Result<Self> {
        let Some(date) = ultrasound_date else {
            return Ok(Self::none());
        };

        if let Some(weeks) = ga_weeks {
            if !(0 < weeks && weeks < 40) {
                return Err(DatingError::InvalidGestationalAge {
                    field: "ga_weeks".to_string(),
                    value: weeks,
                    reason: "expected 0 < ga_weeks < 40".to_string(),
                });
            }
        }

        let days = ga_days.unwrap_or(0);
        if !(0..=6).contains(&days) {
            return Err(DatingError::InvalidGestationalAge {
                field: "ga_days".to_string(),
                value: days,
                reason: "expected 0 <= ga_days <= 6".to_string(),
            });
        }

        let Some(weeks) = ga_weeks else {
            return Ok(Self::none());
        };

        let ga = GestationalInterval::new(weeks, days);
        let edd = date + (GestationalInterval::FULL_TERM - ga).to_duration();

        Ok(Self {
            date: Some(date),
            ga: Some(ga),
            edd: Some(edd),
        })
    }

    /// Like [`UltrasoundDating::new`], but also checks a clinician-recorded EDD.
    ///
    /// The GA implied by `recorded_edd` must fall in the same week as the confirmed GA,
    /// and the derived EDD must be within [`RECORDED_EDD_TOLERANCE_DAYS`] of `recorded_edd`.
    /// Matching weeks already put the two EDDs at most 6 days apart, so with the
    /// current tolerance every rejection comes from the week check.
    pub fn with_recorded_edd(
        ultrasound_date: Option<NaiveDate>,
        ga_weeks: Option<i64>,
        ga_days: Option<i64>,
        recorded_edd: NaiveDate,
    ) -> Result<Self> {
        let ultrasound = Self::new(ultrasound_date, ga_weeks, ga_days)?;
        let (Some(date), Some(ga), Some(edd)) = (ultrasound.date, ultrasound.ga, ultrasound.edd)
        else {
            return Ok(ultrasound);
        };

        let implied_ga =
            GestationalInterval::FULL_TERM - GestationalInterval::between(date, recorded_edd);
        if implied_ga.weeks() != ga.weeks() {
            tracing::warn!(
                "Recorded EDD {} implies GA {} at scan {}, confirmed GA is {}",
                recorded_edd,
                implied_ga,
                date,
                ga
            );
            return Err(DatingError::UltrasoundInconsistency {
                message: format!(
                    "recorded EDD {} implies {} weeks at the scan, but {} weeks were confirmed",
                    recorded_edd,
                    implied_ga.weeks(),
                    ga.weeks()
                ),
            });
        }

        let drift = (edd - recorded_edd).num_days().abs();
        if drift > RECORDED_EDD_TOLERANCE_DAYS {
            tracing::warn!(
                "Recorded EDD {} is {} days from derived EDD {}",
                recorded_edd,
                drift,
                edd
            );
            return Err(DatingError::UltrasoundInconsistency {
                message: format!(
                    "recorded EDD {} differs from derived EDD {} by {} days",
                    recorded_edd, edd, drift
                ),
            });
        }

        Ok(ultrasound)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn ga(&self) -> Option<GestationalInterval> {
        self.ga
    }

    pub fn edd(&self) -> Option<NaiveDate> {
        self.edd
    }
}
