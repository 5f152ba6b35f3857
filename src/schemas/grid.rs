use serde::{Deserialize, Serialize};

/// Column description shared by the grid and every report: subjects in
/// canonical display order with the weights used for aggregation.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubjectHeader {
    pub(crate) id: String,
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) short_code: String,
    pub(crate) order: u16,
    pub(crate) max_score: f64,
    pub(crate) coefficient: f64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GridCell {
    pub(crate) subject_id: String,
    pub(crate) score: Option<f64>,
    pub(crate) max_score: f64,
    pub(crate) coefficient: f64,
    pub(crate) is_saved: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct GridRow {
    pub(crate) student_id: String,
    pub(crate) display_name: String,
    pub(crate) cells: Vec<GridCell>,
    pub(crate) total_score: f64,
    pub(crate) average: f64,
    pub(crate) letter_grade: String,
    pub(crate) rank: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct GridResponse {
    pub(crate) class_id: String,
    pub(crate) class_name: String,
    pub(crate) month: u8,
    pub(crate) year: i32,
    pub(crate) total_coefficient: f64,
    pub(crate) subjects: Vec<SubjectHeader>,
    pub(crate) students: Vec<GridRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeriodQuery {
    pub(crate) month: String,
    pub(crate) year: i32,
}
