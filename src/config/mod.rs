pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::{CliConfig, OutputFormat};

#[cfg(feature = "cli")]
mod args {
    use crate::domain::model::{DatingInput, DatingPolicy};
    use crate::utils::error::{DatingError, Result};
    use crate::utils::validation::{validate_date_order, Validate};
    use chrono::NaiveDate;
    use clap::{Parser, ValueEnum};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
    #[serde(rename_all = "lowercase")]
    pub enum OutputFormat {
        Text,
        Json,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "pregnancy-dating")]
    #[command(about = "Reconcile LMP and ultrasound dating into a GA and EDD")]
    pub struct CliConfig {
        /// Subject label echoed in the output
        #[arg(long, default_value = "")]
        pub subject: String,

        /// Last menstrual period (YYYY-MM-DD)
        #[arg(long)]
        pub lmp: Option<NaiveDate>,

        /// Date the LMP GA is reported at; defaults to today
        #[arg(long)]
        pub reference_date: Option<NaiveDate>,

        #[arg(long)]
        pub ultrasound_date: Option<NaiveDate>,

        /// Confirmed ultrasound GA, whole weeks (1-39)
        #[arg(long, allow_negative_numbers = true)]
        pub ga_weeks: Option<i64>,

        /// Confirmed ultrasound GA, extra days (0-6)
        #[arg(long, allow_negative_numbers = true)]
        pub ga_days: Option<i64>,

        /// EDD written on the ultrasound report, cross-checked against the GA
        #[arg(long)]
        pub recorded_edd: Option<NaiveDate>,

        #[arg(long, help = "Prefer the LMP GA over the ultrasound GA")]
        pub prefer_lmp: bool,

        #[arg(long, help = "Skip the recorded EDD cross-check")]
        pub no_cross_check: bool,

        /// Evaluation date override; defaults to the system date
        #[arg(long)]
        pub today: Option<NaiveDate>,

        #[arg(long, value_enum, default_value = "text")]
        pub format: OutputFormat,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        pub fn to_input(&self) -> DatingInput {
            DatingInput {
                subject: self.subject.clone(),
                lmp_date: self.lmp,
                reference_date: self.reference_date,
                ultrasound_date: self.ultrasound_date,
                ga_weeks: self.ga_weeks,
                ga_days: self.ga_days,
                recorded_edd: self.recorded_edd,
            }
        }

        pub fn policy(&self) -> DatingPolicy {
            DatingPolicy {
                prefer_ultrasound: !self.prefer_lmp,
                cross_check_recorded_edd: !self.no_cross_check,
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if self.ga_days.is_some() && self.ga_weeks.is_none() {
                return Err(DatingError::MissingConfigError {
                    field: "ga_weeks (required with --ga-days)".to_string(),
                });
            }
            if self.recorded_edd.is_some() && self.ultrasound_date.is_none() {
                return Err(DatingError::MissingConfigError {
                    field: "ultrasound_date (required with --recorded-edd)".to_string(),
                });
            }
            if let (Some(lmp), Some(reference)) = (self.lmp, self.reference_date) {
                validate_date_order("reference_date", lmp, reference)?;
            }
            Ok(())
        }
    }

}
