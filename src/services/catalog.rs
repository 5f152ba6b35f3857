use crate::db::models::Subject;
use crate::db::types::Track;
use crate::services::subject_order;

/// Subjects a class actually takes, in canonical display order.
///
/// Keeps subjects matching the class grade that are active; for grades 11
/// and 12 a subject must additionally be trackless, `common`, or on the
/// class's own track. Sorted by the order table, code as tiebreaker.
pub(crate) fn applicable_subjects(
    class_grade: i32,
    class_track: Option<Track>,
    mut subjects: Vec<Subject>,
) -> Vec<Subject> {
    subjects.retain(|subject| is_applicable(class_grade, class_track, subject));
    subjects.sort_by(|a, b| {
        let (order_a, _) = subject_order::position(class_grade, &a.code);
        let (order_b, _) = subject_order::position(class_grade, &b.code);
        order_a.cmp(&order_b).then_with(|| a.code.cmp(&b.code))
    });
    subjects
}

fn is_applicable(class_grade: i32, class_track: Option<Track>, subject: &Subject) -> bool {
    if subject.grade != class_grade || !subject.is_active {
        return false;
    }
    if !matches!(class_grade, 11 | 12) {
        return true;
    }
    match subject.track {
        None | Some(Track::Common) => true,
        Some(track) => Some(track) == class_track,
    }
}

/// Averaging denominator: the coefficient sum over the FULL applicable set,
/// independent of which subjects have recorded scores. Every student in one
/// class/period divides by the same value.
pub(crate) fn total_coefficient(subjects: &[Subject]) -> f64 {
    subjects.iter().map(|subject| subject.coefficient).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    fn subject(code: &str, grade: i32, track: Option<Track>, coefficient: f64) -> Subject {
        let now = primitive_now_utc();
        Subject {
            id: format!("sub-{code}"),
            code: code.to_string(),
            name: code.to_string(),
            grade,
            track,
            max_score: 100.0,
            coefficient,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn filters_by_grade_and_active_flag() {
        let mut inactive = subject("MATH-9", 9, None, 2.0);
        inactive.is_active = false;
        let pool = vec![subject("LIT-9", 9, None, 1.0), subject("MATH-8", 8, None, 2.0), inactive];

        let picked = applicable_subjects(9, None, pool);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].code, "LIT-9");
    }

    #[test]
    fn track_rule_applies_only_to_senior_grades() {
        let pool = vec![
            subject("MATH-10", 10, Some(Track::Science), 2.0),
            subject("LIT-10", 10, Some(Track::Social), 1.0),
        ];
        // Grade 10 ignores track entirely.
        let picked = applicable_subjects(10, Some(Track::Science), pool);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn senior_grades_keep_own_track_common_and_trackless() {
        let pool = vec![
            subject("MATH-11", 11, Some(Track::Science), 2.0),
            subject("HIS-11", 11, Some(Track::Social), 1.0),
            subject("PE-11", 11, Some(Track::Common), 1.0),
            subject("CIV-11", 11, None, 1.0),
        ];
        let picked = applicable_subjects(11, Some(Track::Science), pool);
        let codes: Vec<&str> = picked.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["MATH-11", "CIV-11", "PE-11"]);
    }

    #[test]
    fn sorted_by_order_table_with_code_tiebreaker() {
        let pool = vec![
            subject("ART-7B", 7, None, 1.0),
            subject("MATH-7", 7, None, 2.0),
            subject("ART-7A", 7, None, 1.0),
            subject("ASTRO-7", 7, None, 1.0),
        ];
        let picked = applicable_subjects(7, None, pool);
        let codes: Vec<&str> = picked.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["MATH-7", "ART-7A", "ART-7B", "ASTRO-7"]);
    }

    #[test]
    fn denominator_ignores_recorded_scores() {
        let pool =
            vec![subject("MATH-9", 9, None, 2.0), subject("LIT-9", 9, None, 1.5)];
        assert_eq!(total_coefficient(&pool), 3.5);
        assert_eq!(total_coefficient(&[]), 0.0);
    }
}
