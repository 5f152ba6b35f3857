use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use validator::Validate;

use crate::api::errors::{map_grade_error, ApiError};
use crate::api::validation::parse_month;
use crate::core::state::AppState;
use crate::schemas::grid::{GridResponse, PeriodQuery};
use crate::schemas::reconcile::{ReconcileRequest, ReconcileResponse};
use crate::services::{grid, reconcile};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/grid/:class_id", get(get_grid))
        .route("/reconcile/:class_id", post(reconcile_grades))
}

async fn get_grid(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<GridResponse>, ApiError> {
    let month = parse_month(&params.month)?;

    let response = grid::assemble_grid(state.db(), &class_id, month, params.year)
        .await
        .map_err(map_grade_error)?;

    Ok(Json(response))
}

async fn reconcile_grades(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(payload): Json<ReconcileRequest>,
) -> Result<Json<ReconcileResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let month = payload.month as u8;
    let response = reconcile::reconcile(
        state.db(),
        state.settings().grading(),
        &class_id,
        month,
        payload.year,
        payload.items,
    )
    .await
    .map_err(map_grade_error)?;

    Ok(Json(response))
}
