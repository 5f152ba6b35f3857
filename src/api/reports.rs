use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::{map_grade_error, ApiError};
use crate::api::validation::parse_month;
use crate::core::state::AppState;
use crate::schemas::grid::PeriodQuery;
use crate::schemas::report::{
    GradeWideReportResponse, MonthlyReportResponse, TrackingBookQuery, TrackingBookResponse,
};
use crate::services::reports;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/monthly/:class_id", get(monthly_report))
        .route("/grade/:grade", get(grade_wide_report))
        .route("/tracking-book/:class_id", get(tracking_book))
}

async fn monthly_report(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<MonthlyReportResponse>, ApiError> {
    let month = parse_month(&params.month)?;

    let response = reports::assemble_monthly_report(state.db(), &class_id, month, params.year)
        .await
        .map_err(map_grade_error)?;

    Ok(Json(response))
}

async fn grade_wide_report(
    State(state): State<AppState>,
    Path(grade): Path<i32>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<GradeWideReportResponse>, ApiError> {
    let month = parse_month(&params.month)?;

    let response = reports::assemble_grade_wide_report(state.db(), grade, month, params.year)
        .await
        .map_err(map_grade_error)?;

    Ok(Json(response))
}

async fn tracking_book(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Query(params): Query<TrackingBookQuery>,
) -> Result<Json<TrackingBookResponse>, ApiError> {
    let month = params.month.as_deref().map(parse_month).transpose()?;

    let response = reports::assemble_tracking_book(
        state.db(),
        &class_id,
        params.year,
        month,
        params.subject_id.as_deref(),
    )
    .await
    .map_err(map_grade_error)?;

    Ok(Json(response))
}
