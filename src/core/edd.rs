use crate::core::brackets::{bracket_for, ToleranceBracket};
use crate::core::lmp::LmpDating;
use crate::core::ultrasound::UltrasoundDating;
use crate::domain::model::{DatingMethod, Reconciliation};
use crate::domain::ports::Clock;
use chrono::NaiveDate;

/// Estimated delivery date reconciled from the LMP and ultrasound EDDs.
///
/// When only one source has an EDD it is used as-is. When both do, the LMP's
/// GA as of the clock's date picks a bracket from
/// [`RECONCILIATION_BRACKETS`](crate::core::brackets::RECONCILIATION_BRACKETS):
/// the LMP EDD is kept while the two EDDs differ by no more than the bracket's
/// tolerance, otherwise the ultrasound EDD wins. Before 16 weeks there is no
/// bracket and the result is undetermined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edd {
    result: Reconciliation<NaiveDate>,
    bracket: Option<&'static ToleranceBracket>,
}

impl Edd {
    pub fn new(lmp: &LmpDating, ultrasound: &UltrasoundDating, clock: &impl Clock) -> Self {
        match (lmp.edd(), ultrasound.edd()) {
            (Some(lmp_edd), Some(ultrasound_edd)) => {
                Self::reconcile(lmp, lmp_edd, ultrasound_edd, clock.today())
            }
            (Some(lmp_edd), None) => Self::single(lmp_edd, DatingMethod::Lmp),
            (None, Some(ultrasound_edd)) => Self::single(ultrasound_edd, DatingMethod::Ultrasound),
            (None, None) => Self {
                result: Reconciliation::undetermined(),
                bracket: None,
            },
        }
    }

    fn single(edd: NaiveDate, method: DatingMethod) -> Self {
        tracing::debug!("EDD {} taken from {} (only source)", edd, method);
        Self {
            result: Reconciliation::chosen(edd, method),
            bracket: None,
        }
    }

    fn reconcile(
        lmp: &LmpDating,
        lmp_edd: NaiveDate,
        ultrasound_edd: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let diffdays = (lmp_edd - ultrasound_edd).num_days().abs();
        let bracket = lmp.as_of(today).ga().and_then(bracket_for);

        let Some(bracket) = bracket else {
            tracing::debug!(
                "LMP GA as of {} is below the reconciliation floor; EDD undetermined",
                today
            );
            return Self {
                result: Reconciliation::undetermined(),
                bracket: None,
            };
        };

        let (edd, method) = if bracket.trusts_lmp(diffdays) {
            (lmp_edd, DatingMethod::Lmp)
        } else {
            (ultrasound_edd, DatingMethod::Ultrasound)
        };
        tracing::debug!(
            "EDDs differ by {} days (tolerance {}); using {} EDD {}",
            diffdays,
            bracket.tolerance_days,
            method,
            edd
        );

        Self {
            result: Reconciliation::chosen(edd, method).with_diffdays(diffdays),
            bracket: Some(bracket),
        }
    }

    pub fn edd(&self) -> Option<NaiveDate> {
        self.result.value
    }

    pub fn method(&self) -> DatingMethod {
        self.result.method
    }

    pub fn diffdays(&self) -> Option<i64> {
        self.result.diffdays
    }

    pub fn result(&self) -> Reconciliation<NaiveDate> {
        self.result
    }

    pub fn bracket(&self) -> Option<&'static ToleranceBracket> {
        self.bracket
    }
}
