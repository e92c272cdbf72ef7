//! Grading window configuration, Admin-only. Weights are stored as
//! given; no sum-to-100 enforcement.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateGradingWindowRequest, GradingPeriod, GradingSubPeriod};
use crate::AppState;

/// POST /admin/institutions/:institution_id/grading-periods
pub async fn create_grading_period(
    State(state): State<AppState>,
    Path(institution_id): Path<Uuid>,
    Json(request): Json<CreateGradingWindowRequest>,
) -> Result<(StatusCode, Json<GradingPeriod>), AppError> {
    request.validate()?;

    state
        .db
        .find_institution(institution_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Institution not found")))?;

    let period = GradingPeriod::new(
        institution_id,
        request.name,
        request.weight_percent,
        request.sort_order,
    );
    let created = state.db.create_grading_period(&period).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /admin/grading-periods/:period_id/sub-periods
pub async fn create_grading_sub_period(
    State(state): State<AppState>,
    Path(period_id): Path<Uuid>,
    Json(request): Json<CreateGradingWindowRequest>,
) -> Result<(StatusCode, Json<GradingSubPeriod>), AppError> {
    request.validate()?;

    state
        .db
        .find_grading_period(period_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Grading period not found")))?;

    let sub_period = GradingSubPeriod::new(
        period_id,
        request.name,
        request.weight_percent,
        request.sort_order,
    );
    let created = state.db.create_grading_sub_period(&sub_period).await?;

    Ok((StatusCode::CREATED, Json(created)))
}
