use serde::{Deserialize, Serialize};

use crate::schemas::grid::{GridCell, SubjectHeader};

#[derive(Debug, Serialize)]
pub(crate) struct ReportRow {
    pub(crate) student_id: String,
    pub(crate) display_name: String,
    pub(crate) cells: Vec<GridCell>,
    pub(crate) total_score: f64,
    pub(crate) average: f64,
    pub(crate) letter_grade: String,
    pub(crate) rank: u32,
    pub(crate) absent_without_permission: u32,
    pub(crate) absent_with_permission: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct MonthlyReportResponse {
    pub(crate) class_id: String,
    pub(crate) class_name: String,
    pub(crate) month: u8,
    pub(crate) year: i32,
    pub(crate) total_coefficient: f64,
    pub(crate) subjects: Vec<SubjectHeader>,
    pub(crate) students: Vec<ReportRow>,
}

/// Per-class column snapshot inside the grade-wide report. Subject sets and
/// denominators can differ between classes of one grade (tracks), so each
/// class carries its own.
#[derive(Debug, Serialize)]
pub(crate) struct ClassSection {
    pub(crate) class_id: String,
    pub(crate) class_name: String,
    pub(crate) total_coefficient: f64,
    pub(crate) subjects: Vec<SubjectHeader>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeWideRow {
    pub(crate) student_id: String,
    pub(crate) display_name: String,
    pub(crate) class_id: String,
    pub(crate) class_name: String,
    pub(crate) cells: Vec<GridCell>,
    pub(crate) total_score: f64,
    pub(crate) average: f64,
    pub(crate) letter_grade: String,
    pub(crate) rank: u32,
    pub(crate) absent_without_permission: u32,
    pub(crate) absent_with_permission: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeWideReportResponse {
    pub(crate) grade: i32,
    pub(crate) month: u8,
    pub(crate) year: i32,
    pub(crate) classes: Vec<ClassSection>,
    pub(crate) students: Vec<GradeWideRow>,
}

/// Scores for one subject across the covered periods; `scores[i]` pairs
/// with `months[i]` of the response.
#[derive(Debug, Serialize)]
pub(crate) struct TrackingSubjectRow {
    pub(crate) subject_id: String,
    pub(crate) code: String,
    pub(crate) short_code: String,
    pub(crate) scores: Vec<Option<f64>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrackingPeriodSummary {
    pub(crate) month: u8,
    pub(crate) total_score: f64,
    pub(crate) average: f64,
    pub(crate) letter_grade: String,
    pub(crate) rank: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrackingBookRow {
    pub(crate) student_id: String,
    pub(crate) display_name: String,
    pub(crate) subjects: Vec<TrackingSubjectRow>,
    pub(crate) periods: Vec<TrackingPeriodSummary>,
    pub(crate) absent_without_permission: u32,
    pub(crate) absent_with_permission: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrackingBookResponse {
    pub(crate) class_id: String,
    pub(crate) class_name: String,
    pub(crate) year: i32,
    pub(crate) months: Vec<u8>,
    pub(crate) total_coefficient: f64,
    pub(crate) subjects: Vec<SubjectHeader>,
    pub(crate) students: Vec<TrackingBookRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackingBookQuery {
    pub(crate) year: i32,
    #[serde(default)]
    pub(crate) month: Option<String>,
    #[serde(default)]
    #[serde(alias = "subjectId")]
    pub(crate) subject_id: Option<String>,
}
