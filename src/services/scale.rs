//! Letter-grade policies.
//!
//! Two numerically different threshold sets are in force: the grid grades on
//! a percentage footing, reports grade coefficient-weighted raw points. They
//! are kept as distinct named policies; callers pick one explicitly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GradeScale {
    /// Grid context: averages read against a 0-100 percentage ladder.
    Percentage,
    /// Report context: averages read against raw weighted points.
    RawWeighted,
}

impl GradeScale {
    pub(crate) fn letter(self, average: f64) -> &'static str {
        match self {
            GradeScale::Percentage => {
                if average >= 90.0 {
                    "A"
                } else if average >= 80.0 {
                    "B+"
                } else if average >= 70.0 {
                    "B"
                } else if average >= 60.0 {
                    "C"
                } else if average >= 50.0 {
                    "D"
                } else if average >= 40.0 {
                    "E"
                } else {
                    "F"
                }
            }
            GradeScale::RawWeighted => {
                if average >= 45.0 {
                    "A"
                } else if average >= 40.0 {
                    "B"
                } else if average >= 35.0 {
                    "C"
                } else if average >= 30.0 {
                    "D"
                } else if average >= 25.0 {
                    "E"
                } else {
                    "F"
                }
            }
        }
    }
}

/// Round to two decimals; applied to every average before grading,
/// ranking or serialization.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_thresholds_are_inclusive() {
        let scale = GradeScale::Percentage;
        assert_eq!(scale.letter(90.0), "A");
        assert_eq!(scale.letter(89.99), "B+");
        assert_eq!(scale.letter(80.0), "B+");
        assert_eq!(scale.letter(70.0), "B");
        assert_eq!(scale.letter(60.0), "C");
        assert_eq!(scale.letter(50.0), "D");
        assert_eq!(scale.letter(40.0), "E");
        assert_eq!(scale.letter(39.99), "F");
        assert_eq!(scale.letter(0.0), "F");
    }

    #[test]
    fn raw_weighted_thresholds_are_inclusive() {
        let scale = GradeScale::RawWeighted;
        assert_eq!(scale.letter(45.0), "A");
        assert_eq!(scale.letter(44.99), "B");
        assert_eq!(scale.letter(40.0), "B");
        assert_eq!(scale.letter(35.0), "C");
        assert_eq!(scale.letter(30.0), "D");
        assert_eq!(scale.letter(25.0), "E");
        assert_eq!(scale.letter(24.99), "F");
    }

    #[test]
    fn scales_use_distinct_thresholds() {
        assert_eq!(GradeScale::Percentage.letter(45.0), "E");
        assert_eq!(GradeScale::RawWeighted.letter(45.0), "A");
        assert_eq!(GradeScale::Percentage.letter(42.0), "E");
        assert_eq!(GradeScale::RawWeighted.letter(42.0), "B");
    }

    #[test]
    fn round2_two_decimal_places() {
        assert_eq!(round2(210.0 / 5.0), 42.0);
        assert_eq!(round2(100.0 / 3.0), 33.33);
        assert_eq!(round2(200.0 / 3.0), 66.67);
        assert_eq!(round2(0.0), 0.0);
    }
}
