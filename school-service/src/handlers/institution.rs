//! Institution handlers. Creation is Admin-only (route-level gate);
//! reads are scoped to the caller's accessible set.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::RequestContext;
use crate::models::{CreateInstitutionRequest, Institution, InstitutionResponse};
use crate::AppState;

/// POST /admin/institutions
pub async fn create_institution(
    State(state): State<AppState>,
    Json(request): Json<CreateInstitutionRequest>,
) -> Result<(StatusCode, Json<InstitutionResponse>), AppError> {
    request.validate()?;

    let institution = Institution::new(request.display_name);
    let created = state.db.create_institution(&institution).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /institutions
pub async fn list_institutions(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<InstitutionResponse>>, AppError> {
    let institutions = state
        .db
        .list_institutions(&ctx.institution_filter())
        .await?;

    Ok(Json(institutions.into_iter().map(Into::into).collect()))
}

/// GET /institutions/:institution_id
///
/// Out-of-scope institutions are reported as missing, never as
/// forbidden.
pub async fn get_institution(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(institution_id): Path<Uuid>,
) -> Result<Json<InstitutionResponse>, AppError> {
    if !ctx.institution_filter().allows(institution_id) {
        return Err(AppError::NotFound(anyhow::anyhow!("Institution not found")));
    }

    let institution = state
        .db
        .find_institution(institution_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Institution not found")))?;

    Ok(Json(institution.into()))
}
