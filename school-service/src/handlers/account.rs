//! Account administration handlers. The whole group sits behind an
//! Admin role gate at the route level.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::RequestContext;
use crate::models::{
    Account, AccountInstitutionLink, AccountResponse, CreateAccountRequest, Role, Student,
};
use crate::utils::password::{hash_password, Password};
use crate::AppState;

/// POST /admin/accounts
///
/// Student-role accounts get their student record in the same
/// transaction, so a failed student insert leaves no orphan account.
pub async fn create_account(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    request.validate()?;

    let password_hash = hash_password(&Password::new(request.password))?;

    let account = Account::new(
        request.display_name,
        request.email.to_lowercase(),
        password_hash.into_string(),
        request.role,
        request.primary_institution_id,
    );

    let created = if request.role == Role::Student {
        let full_name = request.student_full_name.ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!(
                "student_full_name is required for student accounts"
            ))
        })?;
        let institution_id = request
            .primary_institution_id
            .map(Ok)
            .unwrap_or_else(|| ctx.require_active_institution())?;

        let student = Student::new(institution_id, full_name, Some(account.account_id));
        let (account, _student) = state.db.create_student_account(&account, &student).await?;
        account
    } else {
        state.db.create_account(&account).await?
    };

    Ok((StatusCode::CREATED, Json(created.sanitized())))
}

/// GET /admin/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = state.db.list_accounts(&ctx.institution_filter()).await?;
    Ok(Json(accounts.iter().map(Account::sanitized).collect()))
}

/// PUT /admin/accounts/:account_id/institutions/:institution_id
///
/// Idempotent: granting an existing link returns the existing row.
pub async fn grant_institution_link(
    State(state): State<AppState>,
    Path((account_id, institution_id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<AccountInstitutionLink>), AppError> {
    state
        .db
        .find_institution(institution_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Institution not found")))?;

    let link = state
        .db
        .grant_institution_link(account_id, institution_id)
        .await?;

    Ok((StatusCode::CREATED, Json(link)))
}

/// DELETE /admin/accounts/:account_id/institutions/:institution_id
pub async fn revoke_institution_link(
    State(state): State<AppState>,
    Path((account_id, institution_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .db
        .revoke_institution_link(account_id, institution_id)
        .await?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(anyhow::anyhow!("Link not found")))
    }
}
