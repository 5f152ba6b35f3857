use std::collections::HashMap;

use sqlx::PgPool;

use crate::db::models::{GradeRecord, SchoolClass, Student, Subject};
use crate::repositories;
use crate::schemas::grid::{GridCell, GridResponse, GridRow, SubjectHeader};
use crate::services::catalog;
use crate::services::error::GradeError;
use crate::services::ranking::{self, RankEntry};
use crate::services::scale::{round2, GradeScale};
use crate::services::subject_order;

/// Grade records indexed as student_id -> subject_id -> record.
pub(crate) type RecordIndex = HashMap<String, HashMap<String, GradeRecord>>;

pub(crate) fn index_records(records: Vec<GradeRecord>) -> RecordIndex {
    let mut index: RecordIndex = HashMap::new();
    for record in records {
        index
            .entry(record.student_id.clone())
            .or_default()
            .insert(record.subject_id.clone(), record);
    }
    index
}

pub(crate) fn lookup<'a>(
    index: &'a RecordIndex,
    student_id: &str,
    subject_id: &str,
) -> Option<&'a GradeRecord> {
    index.get(student_id).and_then(|by_subject| by_subject.get(subject_id))
}

/// Aggregated but unranked student row. Ranks are joined afterwards so one
/// ranking can span populations larger than a single builder call.
#[derive(Debug, Clone)]
pub(crate) struct ComputedRow {
    pub(crate) student_id: String,
    pub(crate) display_name: String,
    pub(crate) cells: Vec<GridCell>,
    pub(crate) total_score: f64,
    pub(crate) average: f64,
    pub(crate) letter_grade: &'static str,
}

/// Dense student x subject matrix. Every student gets one cell per subject
/// in order; only a persisted record with a non-null score contributes to
/// the total and marks its cell saved.
///
/// `total_coefficient` is the full applicable-set coefficient sum computed
/// once per population; every row divides by the same value.
pub(crate) fn build_rows(
    students: &[Student],
    subjects: &[Subject],
    records: &RecordIndex,
    total_coefficient: f64,
    scale: GradeScale,
) -> Vec<ComputedRow> {
    students
        .iter()
        .map(|student| {
            let mut cells = Vec::with_capacity(subjects.len());
            let mut total_score = 0.0;

            for subject in subjects {
                let record = lookup(records, &student.id, &subject.id);
                let score = record.and_then(|record| record.score);
                if let Some(value) = score {
                    total_score += value;
                }
                cells.push(GridCell {
                    subject_id: subject.id.clone(),
                    score,
                    max_score: record.map(|record| record.max_score).unwrap_or(subject.max_score),
                    coefficient: subject.coefficient,
                    is_saved: score.is_some(),
                });
            }

            let average = if total_coefficient > 0.0 {
                round2(total_score / total_coefficient)
            } else {
                0.0
            };

            ComputedRow {
                student_id: student.id.clone(),
                display_name: student.display_name(),
                cells,
                total_score,
                average,
                letter_grade: scale.letter(average),
            }
        })
        .collect()
}

pub(crate) fn rank_entries(rows: &[ComputedRow]) -> Vec<RankEntry> {
    rows.iter()
        .map(|row| RankEntry { id: row.student_id.clone(), average: row.average })
        .collect()
}

pub(crate) fn subject_headers(grade: i32, subjects: &[Subject]) -> Vec<SubjectHeader> {
    subjects
        .iter()
        .map(|subject| {
            let (order, short_code) = subject_order::position(grade, &subject.code);
            SubjectHeader {
                id: subject.id.clone(),
                code: subject.code.clone(),
                name: subject.name.clone(),
                short_code: short_code.to_string(),
                order,
                max_score: subject.max_score,
                coefficient: subject.coefficient,
            }
        })
        .collect()
}

/// One class aggregated for one period: roster, applicable subjects,
/// denominator and computed rows, in display order.
pub(crate) struct ClassAggregate {
    pub(crate) class: SchoolClass,
    pub(crate) students: Vec<Student>,
    pub(crate) subjects: Vec<Subject>,
    pub(crate) total_coefficient: f64,
    pub(crate) rows: Vec<ComputedRow>,
}

pub(crate) async fn aggregate_class(
    pool: &PgPool,
    class_id: &str,
    month: u8,
    year: i32,
    scale: GradeScale,
) -> Result<ClassAggregate, GradeError> {
    let class = repositories::classes::find_by_id(pool, class_id)
        .await?
        .ok_or_else(|| GradeError::not_found(format!("Class {class_id} not found")))?;

    let students = repositories::students::list_active_of_class(pool, class_id).await?;
    let pool_subjects = repositories::subjects::list_active_by_grade(pool, class.grade).await?;
    let subjects = catalog::applicable_subjects(class.grade, class.track, pool_subjects);
    let total_coefficient = catalog::total_coefficient(&subjects);

    let records =
        repositories::grade_records::list_for_class_period(pool, class_id, i32::from(month), year)
            .await?;
    let index = index_records(records);

    let rows = build_rows(&students, &subjects, &index, total_coefficient, scale);

    Ok(ClassAggregate { class, students, subjects, total_coefficient, rows })
}

pub(crate) async fn assemble_grid(
    pool: &PgPool,
    class_id: &str,
    month: u8,
    year: i32,
) -> Result<GridResponse, GradeError> {
    let aggregate = aggregate_class(pool, class_id, month, year, GradeScale::Percentage).await?;
    let ranks = ranking::rank_rows(&rank_entries(&aggregate.rows));

    let students = aggregate
        .rows
        .into_iter()
        .map(|row| GridRow {
            rank: ranks.get(&row.student_id).copied().unwrap_or(0),
            student_id: row.student_id,
            display_name: row.display_name,
            cells: row.cells,
            total_score: row.total_score,
            average: row.average,
            letter_grade: row.letter_grade.to_string(),
        })
        .collect();

    Ok(GridResponse {
        class_id: aggregate.class.id,
        class_name: aggregate.class.name,
        month,
        year,
        total_coefficient: aggregate.total_coefficient,
        subjects: subject_headers(aggregate.class.grade, &aggregate.subjects),
        students,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::types::Gender;

    fn student(id: &str, name: &str) -> Student {
        let now = primitive_now_utc();
        Student {
            id: id.to_string(),
            class_id: Some("c1".to_string()),
            first_name: name.to_string(),
            last_name: "Tran".to_string(),
            local_name: None,
            gender: Gender::Other,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn subject(id: &str, code: &str, coefficient: f64, max_score: f64) -> Subject {
        let now = primitive_now_utc();
        Subject {
            id: id.to_string(),
            code: code.to_string(),
            name: code.to_string(),
            grade: 9,
            track: None,
            max_score,
            coefficient,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn record(student_id: &str, subject_id: &str, score: Option<f64>) -> GradeRecord {
        let now = primitive_now_utc();
        GradeRecord {
            id: format!("g-{student_id}-{subject_id}"),
            student_id: student_id.to_string(),
            subject_id: subject_id.to_string(),
            class_id: "c1".to_string(),
            month: 3,
            year: 2025,
            score,
            max_score: 100.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unscored_coefficients_still_count_toward_the_denominator() {
        let students = vec![student("s1", "An")];
        let subjects = vec![
            subject("m", "MATH-9", 1.0, 100.0),
            subject("l", "LIT-9", 1.0, 100.0),
            subject("e", "ENG-9", 1.0, 100.0),
            subject("p", "PHY-9", 2.0, 100.0),
        ];
        let index = index_records(vec![
            record("s1", "m", Some(60.0)),
            record("s1", "l", Some(70.0)),
            record("s1", "e", Some(80.0)),
        ]);

        let denominator = catalog::total_coefficient(&subjects);
        assert_eq!(denominator, 5.0);

        let rows = build_rows(&students, &subjects, &index, denominator, GradeScale::RawWeighted);
        assert_eq!(rows[0].total_score, 210.0);
        assert_eq!(rows[0].average, 42.0);
        assert_eq!(rows[0].letter_grade, "B");
    }

    #[test]
    fn totals_conserve_recorded_scores() {
        let students = vec![student("s1", "An"), student("s2", "Binh")];
        let subjects = vec![subject("m", "MATH-9", 2.0, 100.0), subject("l", "LIT-9", 1.0, 100.0)];
        let index = index_records(vec![
            record("s1", "m", Some(55.0)),
            record("s1", "l", Some(45.0)),
            record("s2", "m", Some(30.0)),
        ]);

        let rows = build_rows(&students, &subjects, &index, 3.0, GradeScale::Percentage);
        let row_sum: f64 = rows.iter().map(|row| row.total_score).sum();
        assert_eq!(row_sum, 55.0 + 45.0 + 30.0);
    }

    #[test]
    fn every_row_shares_one_denominator() {
        let students = vec![student("s1", "An"), student("s2", "Binh"), student("s3", "Chi")];
        let subjects = vec![subject("m", "MATH-9", 2.0, 100.0), subject("l", "LIT-9", 1.0, 100.0)];
        let index = index_records(vec![record("s2", "m", Some(90.0))]);

        let denominator = catalog::total_coefficient(&subjects);
        let rows = build_rows(&students, &subjects, &index, denominator, GradeScale::Percentage);
        assert_eq!(rows[0].average, 0.0);
        assert_eq!(rows[1].average, 30.0);
        assert_eq!(rows[2].average, 0.0);
    }

    #[test]
    fn zero_applicable_subjects_never_divides() {
        let students = vec![student("s1", "An")];
        let rows = build_rows(&students, &[], &RecordIndex::new(), 0.0, GradeScale::Percentage);
        assert_eq!(rows[0].average, 0.0);
        assert_eq!(rows[0].total_score, 0.0);
        assert!(rows[0].cells.is_empty());
        assert_eq!(rows[0].letter_grade, "F");
    }

    #[test]
    fn null_score_records_leave_cells_unsaved() {
        let students = vec![student("s1", "An")];
        let subjects = vec![subject("m", "MATH-9", 1.0, 100.0)];
        let index = index_records(vec![record("s1", "m", None)]);

        let rows = build_rows(&students, &subjects, &index, 1.0, GradeScale::Percentage);
        assert_eq!(rows[0].cells[0].score, None);
        assert!(!rows[0].cells[0].is_saved);
        assert_eq!(rows[0].total_score, 0.0);
    }

    #[test]
    fn no_score_students_stay_in_the_ranked_set() {
        let students = vec![student("s1", "An"), student("s2", "Binh")];
        let subjects = vec![subject("m", "MATH-9", 1.0, 100.0)];
        let index = index_records(vec![record("s2", "m", Some(80.0))]);

        let rows = build_rows(&students, &subjects, &index, 1.0, GradeScale::Percentage);
        let ranks = ranking::rank_rows(&rank_entries(&rows));
        assert_eq!(ranks.get("s2"), Some(&1));
        assert_eq!(ranks.get("s1"), Some(&2));
    }

    #[test]
    fn saved_cells_keep_their_max_score_snapshot() {
        let students = vec![student("s1", "An")];
        let subjects = vec![subject("m", "MATH-9", 1.0, 10.0)];
        let mut snap = record("s1", "m", Some(8.0));
        snap.max_score = 20.0;
        let index = index_records(vec![snap]);

        let rows = build_rows(&students, &subjects, &index, 1.0, GradeScale::Percentage);
        assert_eq!(rows[0].cells[0].max_score, 20.0);
    }
}
