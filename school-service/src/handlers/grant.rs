//! Role-grant administration. Changes take effect on the next request;
//! capabilities are re-read from the store every time a session is
//! resolved, so nothing needs invalidating.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateRoleGrantRequest, RoleGrant};
use crate::AppState;

/// POST /admin/role-grants
pub async fn create_role_grant(
    State(state): State<AppState>,
    Json(request): Json<CreateRoleGrantRequest>,
) -> Result<(StatusCode, Json<RoleGrant>), AppError> {
    request.validate()?;

    let grant = RoleGrant::new(
        request.role.as_str().to_string(),
        request.module,
        request.action,
    );
    let created = state.db.create_role_grant(&grant).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /admin/role-grants
pub async fn list_role_grants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoleGrant>>, AppError> {
    let grants = state.db.list_role_grants().await?;
    Ok(Json(grants))
}

/// DELETE /admin/role-grants/:grant_id
pub async fn delete_role_grant(
    State(state): State<AppState>,
    Path(grant_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_role_grant(grant_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(anyhow::anyhow!("Grant not found")))
    }
}
