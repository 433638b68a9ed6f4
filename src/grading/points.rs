//! Point weighting for normalized courses.
//!
//! Three districts' rules coexist here: a flat honors bonus, an added-value
//! column with credit doubling, and a live-roster variant that skips
//! pass/fail courses but still counts unmapped grades at zero points.

use crate::grading::normalize::normalize_grade;
use crate::grading::types::{CourseRecord, Letter, NormalizedGrade, ScoredCourse};

/// Base 4.0-scale mapping.
pub fn base_points(letter: Letter) -> f64 {
    match letter {
        Letter::A => 4.0,
        Letter::B => 3.0,
        Letter::C => 2.0,
        Letter::D => 1.0,
        Letter::F => 0.0,
    }
}

/// Strategy for turning a lettered course into a point value.
#[derive(Debug, Clone)]
pub enum Weighting {
    /// +1 on top of the base points when the scale/description matches one
    /// of the honors markers and the grade is not an F.
    SimpleBonus { markers: Vec<String> },
    /// Base points plus the added-value column (forced to 0 for an F),
    /// doubled for full-credit (1.0) courses.
    AddedValueCredit,
}

/// What to do with grades outside A-F that are not "P".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidGrades {
    /// Leave the course out of both totals.
    Drop,
    /// Count the course with zero points.
    ScoreZero,
}

/// Scoring rules for one pipeline run.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    pub weighting: Weighting,
    pub invalid_grades: InvalidGrades,
}

impl ScoringPolicy {
    /// File-export policy: courses whose description matches `marker` get a
    /// flat +1, unmapped grades are dropped.
    pub fn honors_summary(marker: &str) -> Self {
        Self {
            weighting: Weighting::SimpleBonus {
                markers: vec![marker.to_string()],
            },
            invalid_grades: InvalidGrades::Drop,
        }
    }

    /// File-export policy using the added-value column and credit doubling.
    pub fn credit_weighted() -> Self {
        Self {
            weighting: Weighting::AddedValueCredit,
            invalid_grades: InvalidGrades::Drop,
        }
    }

    /// Live-roster policy: "ap"/"honors" scales earn the bonus, pass/fail
    /// courses are skipped, anything unmapped still counts at zero points.
    pub fn live_roster() -> Self {
        Self {
            weighting: Weighting::SimpleBonus {
                markers: vec!["ap".to_string(), "honors".to_string()],
            },
            invalid_grades: InvalidGrades::ScoreZero,
        }
    }

    /// Scores one record. `None` means the course is excluded from both the
    /// point total and the course count.
    pub fn score(&self, record: CourseRecord) -> Option<ScoredCourse> {
        let grade = normalize_grade(&record.raw_grade);
        let points = match grade {
            NormalizedGrade::Letter(letter) => course_points(letter, &record, &self.weighting),
            NormalizedGrade::Pass => return None,
            NormalizedGrade::Invalid => match self.invalid_grades {
                InvalidGrades::Drop => return None,
                InvalidGrades::ScoreZero => 0.0,
            },
        };
        Some(ScoredCourse {
            record,
            grade,
            points,
        })
    }
}

/// Point value for a single lettered course under the given weighting.
pub fn course_points(letter: Letter, record: &CourseRecord, weighting: &Weighting) -> f64 {
    match weighting {
        Weighting::SimpleBonus { markers } => {
            let mut points = base_points(letter);
            if letter != Letter::F && is_honors(&record.scale, markers) {
                points += 1.0;
            }
            points
        }
        Weighting::AddedValueCredit => {
            let added = if letter == Letter::F {
                0.0
            } else {
                record.added_value.unwrap_or(0.0)
            };
            let multiplier = if record.credits == Some(1.0) { 2.0 } else { 1.0 };
            (base_points(letter) + added) * multiplier
        }
    }
}

fn is_honors(scale: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| scale.trim().eq_ignore_ascii_case(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::types::StudentName;

    fn record(grade: &str, scale: &str, credits: Option<f64>, added: Option<f64>) -> CourseRecord {
        CourseRecord {
            student_id: "100".to_string(),
            name: StudentName::Combined("Doe, Jane".to_string()),
            grade_level: "9".to_string(),
            raw_grade: grade.to_string(),
            scale: scale.to_string(),
            credits,
            added_value: added,
        }
    }

    #[test]
    fn test_base_mapping() {
        assert_eq!(base_points(Letter::A), 4.0);
        assert_eq!(base_points(Letter::B), 3.0);
        assert_eq!(base_points(Letter::C), 2.0);
        assert_eq!(base_points(Letter::D), 1.0);
        assert_eq!(base_points(Letter::F), 0.0);
    }

    #[test]
    fn test_honors_bonus_applies_to_marked_courses() {
        let policy = ScoringPolicy::honors_summary("AP Grades");
        let scored = policy.score(record("A", "AP Grades", None, None)).unwrap();
        assert_eq!(scored.points, 5.0);

        let scored = policy.score(record("A", "Regular", None, None)).unwrap();
        assert_eq!(scored.points, 4.0);
    }

    #[test]
    fn test_honors_marker_matching_ignores_case_and_padding() {
        let policy = ScoringPolicy::honors_summary("AP Grades");
        let scored = policy.score(record("B", " ap grades ", None, None)).unwrap();
        assert_eq!(scored.points, 4.0);
    }

    #[test]
    fn test_f_never_earns_the_bonus() {
        let policy = ScoringPolicy::honors_summary("AP Grades");
        let scored = policy.score(record("F", "AP Grades", None, None)).unwrap();
        assert_eq!(scored.points, 0.0);
    }

    #[test]
    fn test_simple_bonus_points_stay_in_range() {
        let policy = ScoringPolicy::honors_summary("AP Grades");
        for grade in ["A", "B", "C", "D", "F"] {
            for scale in ["AP Grades", "Regular"] {
                let scored = policy.score(record(grade, scale, None, None)).unwrap();
                assert!(scored.points >= 0.0 && scored.points <= 5.0);
                assert_eq!(scored.points.fract(), 0.0);
            }
        }
    }

    #[test]
    fn test_added_value_and_credit_multiplier() {
        let policy = ScoringPolicy::credit_weighted();
        let scored = policy.score(record("B", "0.5", Some(1.0), Some(0.5))).unwrap();
        assert_eq!(scored.points, 7.0);

        let scored = policy.score(record("B", "0.5", Some(0.5), Some(0.5))).unwrap();
        assert_eq!(scored.points, 3.5);
    }

    #[test]
    fn test_full_credit_doubles_half_credit() {
        let policy = ScoringPolicy::credit_weighted();
        let full = policy.score(record("A", "1", Some(1.0), Some(1.0))).unwrap();
        let half = policy.score(record("A", "1", Some(0.5), Some(1.0))).unwrap();
        assert_eq!(full.points, half.points * 2.0);
    }

    #[test]
    fn test_f_forces_added_value_to_zero() {
        let policy = ScoringPolicy::credit_weighted();
        let scored = policy.score(record("F", "2", Some(1.0), Some(2.0))).unwrap();
        assert_eq!(scored.points, 0.0);
    }

    #[test]
    fn test_missing_numeric_fields_coerce_to_defaults() {
        let policy = ScoringPolicy::credit_weighted();
        let scored = policy.score(record("C", "", None, None)).unwrap();
        assert_eq!(scored.points, 2.0);
    }

    #[test]
    fn test_pass_is_always_excluded() {
        assert!(ScoringPolicy::honors_summary("AP Grades")
            .score(record("P", "Regular", None, None))
            .is_none());
        assert!(ScoringPolicy::live_roster()
            .score(record("P", "ap", None, None))
            .is_none());
    }

    #[test]
    fn test_invalid_grades_follow_the_policy() {
        let drop = ScoringPolicy::honors_summary("AP Grades");
        assert!(drop.score(record("W", "Regular", None, None)).is_none());

        let zero = ScoringPolicy::live_roster();
        let scored = zero.score(record("W", "Regular", None, None)).unwrap();
        assert_eq!(scored.points, 0.0);
        assert_eq!(scored.grade, NormalizedGrade::Invalid);
    }

    #[test]
    fn test_live_roster_markers() {
        let policy = ScoringPolicy::live_roster();
        assert_eq!(policy.score(record("A", "AP", None, None)).unwrap().points, 5.0);
        assert_eq!(policy.score(record("A", "Honors", None, None)).unwrap().points, 5.0);
        assert_eq!(policy.score(record("A", "Standard", None, None)).unwrap().points, 4.0);
    }
}
