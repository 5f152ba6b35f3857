use std::collections::HashMap;

use sqlx::PgPool;

use crate::db::models::{GradeRecord, Subject};
use crate::repositories;
use crate::schemas::grid::SubjectHeader;
use crate::schemas::report::{
    ClassSection, GradeWideReportResponse, GradeWideRow, MonthlyReportResponse, ReportRow,
    TrackingBookResponse, TrackingBookRow, TrackingPeriodSummary, TrackingSubjectRow,
};
use crate::services::attendance;
use crate::services::catalog;
use crate::services::error::GradeError;
use crate::services::grid;
use crate::services::ranking::{self, RankEntry};
use crate::services::scale::GradeScale;
use crate::services::subject_order;

/// One class for one month, on the report scale, with absence counts.
pub(crate) async fn assemble_monthly_report(
    pool: &PgPool,
    class_id: &str,
    month: u8,
    year: i32,
) -> Result<MonthlyReportResponse, GradeError> {
    let (from, to) = attendance::month_range(year, month)?;

    let aggregate =
        grid::aggregate_class(pool, class_id, month, year, GradeScale::RawWeighted).await?;
    let ranks = ranking::rank_rows(&grid::rank_entries(&aggregate.rows));

    let attendance_records =
        repositories::attendance::list_for_class_in_range(pool, class_id, from, to).await?;
    let absences = attendance::summarize(&attendance_records);

    let students = aggregate
        .rows
        .into_iter()
        .map(|row| {
            let summary = absences.get(&row.student_id).copied().unwrap_or_default();
            ReportRow {
                rank: ranks.get(&row.student_id).copied().unwrap_or(0),
                student_id: row.student_id,
                display_name: row.display_name,
                cells: row.cells,
                total_score: row.total_score,
                average: row.average,
                letter_grade: row.letter_grade.to_string(),
                absent_without_permission: summary.absent_without_permission,
                absent_with_permission: summary.absent_with_permission,
            }
        })
        .collect();

    Ok(MonthlyReportResponse {
        class_id: aggregate.class.id,
        class_name: aggregate.class.name,
        month,
        year,
        total_coefficient: aggregate.total_coefficient,
        subjects: grid::subject_headers(aggregate.class.grade, &aggregate.subjects),
        students,
    })
}

struct ClassContext {
    class_name: String,
    subjects: Vec<Subject>,
    total_coefficient: f64,
}

/// Every active class of a grade in one report. Each row is aggregated
/// against its own class's subject set and denominator; the ranking runs
/// once across the whole population.
pub(crate) async fn assemble_grade_wide_report(
    pool: &PgPool,
    grade: i32,
    month: u8,
    year: i32,
) -> Result<GradeWideReportResponse, GradeError> {
    let (from, to) = attendance::month_range(year, month)?;

    let classes = repositories::classes::list_active_by_grade(pool, grade).await?;
    if classes.is_empty() {
        return Err(GradeError::not_found(format!("No active classes for grade {grade}")));
    }

    let class_ids: Vec<String> = classes.iter().map(|class| class.id.clone()).collect();
    let students = repositories::students::list_active_of_classes(pool, &class_ids).await?;
    let pool_subjects = repositories::subjects::list_active_by_grade(pool, grade).await?;

    let mut sections = Vec::with_capacity(classes.len());
    let mut contexts: HashMap<String, ClassContext> = HashMap::new();
    for class in classes {
        let subjects =
            catalog::applicable_subjects(class.grade, class.track, pool_subjects.clone());
        let total_coefficient = catalog::total_coefficient(&subjects);
        sections.push(ClassSection {
            class_id: class.id.clone(),
            class_name: class.name.clone(),
            total_coefficient,
            subjects: grid::subject_headers(grade, &subjects),
        });
        contexts.insert(
            class.id,
            ClassContext { class_name: class.name, subjects, total_coefficient },
        );
    }

    let records = repositories::grade_records::list_for_classes_period(
        pool,
        &class_ids,
        i32::from(month),
        year,
    )
    .await?;
    let index = grid::index_records(records);

    // Students arrive in grade-wide display order; each row keeps it.
    let mut computed: Vec<(grid::ComputedRow, String, String)> = Vec::new();
    for student in &students {
        let Some(class_id) = student.class_id.clone() else { continue };
        let Some(context) = contexts.get(&class_id) else { continue };
        let mut rows = grid::build_rows(
            std::slice::from_ref(student),
            &context.subjects,
            &index,
            context.total_coefficient,
            GradeScale::RawWeighted,
        );
        if let Some(row) = rows.pop() {
            computed.push((row, class_id, context.class_name.clone()));
        }
    }

    let entries: Vec<RankEntry> = computed
        .iter()
        .map(|(row, _, _)| RankEntry { id: row.student_id.clone(), average: row.average })
        .collect();
    let ranks = ranking::rank_rows(&entries);

    let attendance_records =
        repositories::attendance::list_for_classes_in_range(pool, &class_ids, from, to).await?;
    let absences = attendance::summarize(&attendance_records);

    let students = computed
        .into_iter()
        .map(|(row, class_id, class_name)| {
            let summary = absences.get(&row.student_id).copied().unwrap_or_default();
            GradeWideRow {
                rank: ranks.get(&row.student_id).copied().unwrap_or(0),
                student_id: row.student_id,
                display_name: row.display_name,
                class_id,
                class_name,
                cells: row.cells,
                total_score: row.total_score,
                average: row.average,
                letter_grade: row.letter_grade.to_string(),
                absent_without_permission: summary.absent_without_permission,
                absent_with_permission: summary.absent_with_permission,
            }
        })
        .collect();

    Ok(GradeWideReportResponse { grade, month, year, classes: sections, students })
}

/// One class across a year (or a single month), per-subject scores by
/// period plus per-period summaries and absence totals. A subject filter
/// narrows the per-subject rows; period summaries keep the full
/// denominator so ranks stay comparable.
pub(crate) async fn assemble_tracking_book(
    pool: &PgPool,
    class_id: &str,
    year: i32,
    month: Option<u8>,
    subject_filter: Option<&str>,
) -> Result<TrackingBookResponse, GradeError> {
    let (from, to) = match month {
        Some(value) => attendance::month_range(year, value)?,
        None => {
            let (from, _) = attendance::month_range(year, 1)?;
            let (_, to) = attendance::month_range(year, 12)?;
            (from, to)
        }
    };

    let class = repositories::classes::find_by_id(pool, class_id)
        .await?
        .ok_or_else(|| GradeError::not_found(format!("Class {class_id} not found")))?;

    let students = repositories::students::list_active_of_class(pool, class_id).await?;
    let pool_subjects = repositories::subjects::list_active_by_grade(pool, class.grade).await?;
    let subjects = catalog::applicable_subjects(class.grade, class.track, pool_subjects);
    let total_coefficient = catalog::total_coefficient(&subjects);

    let keep: Vec<usize> = match subject_filter {
        Some(filter) => {
            let indices: Vec<usize> = subjects
                .iter()
                .enumerate()
                .filter(|(_, subject)| subject.id == filter)
                .map(|(index, _)| index)
                .collect();
            if indices.is_empty() {
                return Err(GradeError::validation(format!(
                    "Subject {filter} is not applicable to class {class_id}"
                )));
            }
            indices
        }
        None => (0..subjects.len()).collect(),
    };

    let months: Vec<u8> = match month {
        Some(value) => vec![value],
        None => (1..=12).collect(),
    };

    let records = match month {
        Some(value) => {
            repositories::grade_records::list_for_class_period(
                pool,
                class_id,
                i32::from(value),
                year,
            )
            .await?
        }
        None => repositories::grade_records::list_for_class_year(pool, class_id, year).await?,
    };
    let mut by_month: HashMap<u8, Vec<GradeRecord>> = HashMap::new();
    for record in records {
        let Ok(value) = u8::try_from(record.month) else { continue };
        by_month.entry(value).or_default().push(record);
    }

    let mut period_rows: Vec<(u8, Vec<grid::ComputedRow>, HashMap<String, u32>)> =
        Vec::with_capacity(months.len());
    for &value in &months {
        let index = grid::index_records(by_month.remove(&value).unwrap_or_default());
        let rows =
            grid::build_rows(&students, &subjects, &index, total_coefficient, GradeScale::RawWeighted);
        let ranks = ranking::rank_rows(&grid::rank_entries(&rows));
        period_rows.push((value, rows, ranks));
    }

    let attendance_records =
        repositories::attendance::list_for_class_in_range(pool, class_id, from, to).await?;
    let absences = attendance::summarize(&attendance_records);

    let student_rows = students
        .iter()
        .enumerate()
        .map(|(position, student)| {
            let subject_rows: Vec<TrackingSubjectRow> = keep
                .iter()
                .map(|&subject_index| {
                    let subject = &subjects[subject_index];
                    TrackingSubjectRow {
                        subject_id: subject.id.clone(),
                        code: subject.code.clone(),
                        short_code: subject_order::position(class.grade, &subject.code)
                            .1
                            .to_string(),
                        scores: period_rows
                            .iter()
                            .map(|(_, rows, _)| rows[position].cells[subject_index].score)
                            .collect(),
                    }
                })
                .collect();

            let periods: Vec<TrackingPeriodSummary> = period_rows
                .iter()
                .map(|(value, rows, ranks)| {
                    let row = &rows[position];
                    TrackingPeriodSummary {
                        month: *value,
                        total_score: row.total_score,
                        average: row.average,
                        letter_grade: row.letter_grade.to_string(),
                        rank: ranks.get(&student.id).copied().unwrap_or(0),
                    }
                })
                .collect();

            let summary = absences.get(&student.id).copied().unwrap_or_default();
            TrackingBookRow {
                student_id: student.id.clone(),
                display_name: student.display_name(),
                subjects: subject_rows,
                periods,
                absent_without_permission: summary.absent_without_permission,
                absent_with_permission: summary.absent_with_permission,
            }
        })
        .collect();

    let headers = grid::subject_headers(class.grade, &subjects);
    let subjects_out: Vec<SubjectHeader> =
        keep.iter().map(|&index| headers[index].clone()).collect();

    Ok(TrackingBookResponse {
        class_id: class.id,
        class_name: class.name,
        year,
        months,
        total_coefficient,
        subjects: subjects_out,
        students: student_rows,
    })
}
