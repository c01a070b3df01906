use crate::core::edd::Edd;
use crate::core::ga::Ga;
use crate::core::lmp::LmpDating;
use crate::core::ultrasound::UltrasoundDating;
use crate::domain::model::{DatingInput, DatingOutcome, DatingPolicy};
use crate::domain::ports::Clock;
use crate::utils::error::Result;

/// Runs the full dating for one subject.
///
/// Fails only on malformed ultrasound input; missing dates produce absent fields.
pub fn assess(input: &DatingInput, policy: &DatingPolicy, clock: &impl Clock) -> Result<DatingOutcome> {
    let lmp = LmpDating::new(input.lmp_date, input.reference_date, clock);
    let ultrasound = match input.recorded_edd {
        Some(recorded_edd) if policy.cross_check_recorded_edd => UltrasoundDating::with_recorded_edd(
            input.ultrasound_date,
            input.ga_weeks,
            input.ga_days,
            recorded_edd,
        )?,
        _ => UltrasoundDating::new(input.ultrasound_date, input.ga_weeks, input.ga_days)?,
    };

    let ga = Ga::new(&lmp, &ultrasound, policy.prefer_ultrasound);
    let edd = Edd::new(&lmp, &ultrasound, clock);

    Ok(DatingOutcome {
        subject: input.subject.clone(),
        edd: edd.edd(),
        edd_method: edd.method(),
        diffdays: edd.diffdays(),
        ga_weeks: ga.ga().map(|value| value.weeks()),
        ga_days: ga.ga().map(|value| value.days()),
        ga_method: ga.method(),
        lmp_edd: lmp.edd(),
        lmp_days_until_edd: lmp.days_until_edd(),
        ultrasound_edd: ultrasound.edd(),
        error: None,
    })
}
