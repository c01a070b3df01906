//! GA brackets used to reconcile LMP and ultrasound EDDs.
//!
//! Each bracket gives the largest EDD disagreement (in days) for which the LMP
//! estimate is kept. Below the first bracket no reconciliation is defined.

use crate::domain::model::GestationalInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToleranceBracket {
    pub lower: GestationalInterval,
    /// Inclusive; `None` is open-ended.
    pub upper: Option<GestationalInterval>,
    pub tolerance_days: i64,
}

impl ToleranceBracket {
    pub fn contains(&self, ga: GestationalInterval) -> bool {
        ga >= self.lower && self.upper.map_or(true, |upper| ga <= upper)
    }

    pub fn trusts_lmp(&self, diffdays: i64) -> bool {
        diffdays <= self.tolerance_days
    }
}

/// Ordered, non-overlapping.
pub static RECONCILIATION_BRACKETS: [ToleranceBracket; 3] = [
    ToleranceBracket {
        lower: GestationalInterval::new(16, 0),
        upper: Some(GestationalInterval::new(21, 6)),
        tolerance_days: 10,
    },
    ToleranceBracket {
        lower: GestationalInterval::new(22, 0),
        upper: Some(GestationalInterval::new(27, 6)),
        tolerance_days: 14,
    },
    ToleranceBracket {
        lower: GestationalInterval::new(28, 0),
        upper: None,
        tolerance_days: 21,
    },
];

pub fn bracket_for(ga: GestationalInterval) -> Option<&'static ToleranceBracket> {
    RECONCILIATION_BRACKETS
        .iter()
        .find(|bracket| bracket.contains(ga))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tolerance_at(weeks: i64, days: i64) -> Option<i64> {
        bracket_for(GestationalInterval::new(weeks, days)).map(|b| b.tolerance_days)
    }

    #[test]
    fn test_no_bracket_before_16_weeks() {
        assert_eq!(tolerance_at(0, 0), None);
        assert_eq!(tolerance_at(15, 6), None);
    }

    #[test]
    fn test_bracket_edges() {
        assert_eq!(tolerance_at(16, 0), Some(10));
        assert_eq!(tolerance_at(21, 6), Some(10));
        assert_eq!(tolerance_at(22, 0), Some(14));
        assert_eq!(tolerance_at(27, 6), Some(14));
        assert_eq!(tolerance_at(28, 0), Some(21));
        assert_eq!(tolerance_at(45, 3), Some(21));
    }

    #[test]
    fn test_table_is_ordered_and_contiguous() {
        for pair in RECONCILIATION_BRACKETS.windows(2) {
            let upper = pair[0].upper.unwrap();
            assert_eq!(upper + GestationalInterval::from_days(1), pair[1].lower);
        }
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let bracket = bracket_for(GestationalInterval::from_weeks(18)).unwrap();
        assert!(bracket.trusts_lmp(10));
        assert!(!bracket.trusts_lmp(11));
    }
}
