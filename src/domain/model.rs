use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A pregnancy duration in weeks and days.
///
/// Held as a signed day count; `weeks()` floors and `days()` is always in `0..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "WeeksAndDays", from = "WeeksAndDays")]
pub struct GestationalInterval {
    total_days: i64,
}

impl GestationalInterval {
    /// 40 weeks, the fixed pregnancy length both dating methods assume.
    pub const FULL_TERM: GestationalInterval = GestationalInterval::from_weeks(40);

    pub const fn new(weeks: i64, days: i64) -> Self {
        Self {
            total_days: weeks * 7 + days,
        }
    }

    pub const fn from_weeks(weeks: i64) -> Self {
        Self::new(weeks, 0)
    }

    pub const fn from_days(total_days: i64) -> Self {
        Self { total_days }
    }

    /// Elapsed interval from `start` to `end`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::from_days((end - start).num_days())
    }

    pub const fn weeks(&self) -> i64 {
        self.total_days.div_euclid(7)
    }

    pub const fn days(&self) -> i64 {
        self.total_days.rem_euclid(7)
    }

    pub const fn total_days(&self) -> i64 {
        self.total_days
    }

    pub fn to_duration(&self) -> TimeDelta {
        TimeDelta::days(self.total_days)
    }
}

impl Add for GestationalInterval {
    type Output = GestationalInterval;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_days(self.total_days + rhs.total_days)
    }
}

impl Sub for GestationalInterval {
    type Output = GestationalInterval;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_days(self.total_days - rhs.total_days)
    }
}

impl fmt::Display for GestationalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}w{}d", self.weeks(), self.days())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct WeeksAndDays {
    weeks: i64,
    days: i64,
}

impl From<GestationalInterval> for WeeksAndDays {
    fn from(value: GestationalInterval) -> Self {
        Self {
            weeks: value.weeks(),
            days: value.days(),
        }
    }
}

impl From<WeeksAndDays> for GestationalInterval {
    fn from(value: WeeksAndDays) -> Self {
        GestationalInterval::new(value.weeks, value.days)
    }
}

/// Which source a GA or EDD value was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DatingMethod {
    #[serde(rename = "LMP")]
    Lmp,
    #[serde(rename = "ULTRASOUND")]
    Ultrasound,
    #[default]
    #[serde(rename = "NONE")]
    Undetermined,
}

impl fmt::Display for DatingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DatingMethod::Lmp => "LMP",
            DatingMethod::Ultrasound => "ULTRASOUND",
            DatingMethod::Undetermined => "NONE",
        };
        f.write_str(label)
    }
}

/// Outcome shared by GA selection and EDD reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation<T> {
    pub value: Option<T>,
    pub method: DatingMethod,
    pub diffdays: Option<i64>,
}

impl<T> Reconciliation<T> {
    pub fn undetermined() -> Self {
        Self {
            value: None,
            method: DatingMethod::Undetermined,
            diffdays: None,
        }
    }

    pub fn chosen(value: T, method: DatingMethod) -> Self {
        Self {
            value: Some(value),
            method,
            diffdays: None,
        }
    }

    pub fn with_diffdays(mut self, diffdays: i64) -> Self {
        self.diffdays = Some(diffdays);
        self
    }
}

impl<T> Default for Reconciliation<T> {
    fn default() -> Self {
        Self::undetermined()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatingPolicy {
    pub prefer_ultrasound: bool,
    /// Cross-check a recorded EDD against the recorded ultrasound GA.
    pub cross_check_recorded_edd: bool,
}

impl Default for DatingPolicy {
    fn default() -> Self {
        Self {
            prefer_ultrasound: true,
            cross_check_recorded_edd: true,
        }
    }
}

/// One subject's raw dating inputs. Empty CSV cells deserialize as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatingInput {
    #[serde(default)]
    pub subject: String,
    pub lmp_date: Option<NaiveDate>,
    pub reference_date: Option<NaiveDate>,
    pub ultrasound_date: Option<NaiveDate>,
    pub ga_weeks: Option<i64>,
    pub ga_days: Option<i64>,
    pub recorded_edd: Option<NaiveDate>,
}

/// One input row as read by the batch extractor. `row` is the 1-based line in
/// the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRecord {
    Parsed {
        row: usize,
        input: DatingInput,
    },
    /// The row could not be read into a `DatingInput`. `subject` is whatever the
    /// subject cell held, possibly empty.
    Malformed {
        row: usize,
        subject: String,
        message: String,
    },
}

impl SourceRecord {
    pub fn row(&self) -> usize {
        match self {
            SourceRecord::Parsed { row, .. } | SourceRecord::Malformed { row, .. } => *row,
        }
    }
}

/// Flat result row handed back to collaborators and written by the batch pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatingOutcome {
    pub subject: String,
    pub edd: Option<NaiveDate>,
    pub edd_method: DatingMethod,
    pub diffdays: Option<i64>,
    pub ga_weeks: Option<i64>,
    pub ga_days: Option<i64>,
    pub ga_method: DatingMethod,
    pub lmp_edd: Option<NaiveDate>,
    /// Unsigned days between the LMP EDD and the LMP reference date.
    pub lmp_days_until_edd: Option<i64>,
    pub ultrasound_edd: Option<NaiveDate>,
    pub error: Option<String>,
}

impl DatingOutcome {
    pub fn rejected(subject: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub outcomes: Vec<DatingOutcome>,
    pub rejected: usize,
}
