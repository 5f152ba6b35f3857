use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ReconcileRequest {
    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    pub(crate) month: i32,
    #[validate(range(min = 1970, max = 9999, message = "year out of range"))]
    pub(crate) year: i32,
    #[serde(default)]
    pub(crate) items: Vec<ReconcileItem>,
}

/// One incoming score. Identity and score are optional at the wire level:
/// incomplete items are collected into the response error list instead of
/// failing the whole batch.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReconcileItem {
    #[serde(default)]
    #[serde(alias = "studentId")]
    pub(crate) student_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "subjectId")]
    pub(crate) subject_id: Option<String>,
    #[serde(default)]
    pub(crate) score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct ReconcileItemError {
    pub(crate) student_id: Option<String>,
    pub(crate) subject_id: Option<String>,
    pub(crate) reason: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WriteStatus {
    Complete,
    Partial,
    Failed,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReconcileResponse {
    pub(crate) created: u64,
    pub(crate) updated: u64,
    pub(crate) skipped: u64,
    pub(crate) errors: Vec<ReconcileItemError>,
    pub(crate) write_status: WriteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) detail: Option<String>,
}
