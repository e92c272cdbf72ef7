//! Login and current-session handlers.

use axum::{extract::State, Json};
use serde::Serialize;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::RequestContext;
use crate::models::{AuthResponse, LoginRequest, TokenResponse};
use crate::utils::password::{verify_password, Password, PasswordHashString};
use crate::AppState;

/// POST /auth/login
///
/// The failure message is identical for unknown email and wrong
/// password so the endpoint cannot be used to probe for accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    request.validate()?;

    let account = state
        .auth
        .directory
        .find_account_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::Unauthenticated(anyhow::anyhow!("Invalid email or password")))?;

    let password = Password::new(request.password);
    let stored = PasswordHashString::new(account.password_hash.clone());
    verify_password(&password, &stored).map_err(|_| {
        tracing::warn!(email = %request.email, "Login failed: password mismatch");
        AppError::Unauthenticated(anyhow::anyhow!("Invalid email or password"))
    })?;

    if !account.is_active() {
        tracing::warn!(account_id = %account.account_id, "Login rejected: account not active");
        return Err(AppError::AccountInactive("Account is not active".to_string()));
    }

    let access_token = state
        .auth
        .jwt
        .generate_access_token(&account.account_id.to_string(), &account.email)?;

    tracing::info!(account_id = %account.account_id, "Login successful");

    Ok(Json(AuthResponse {
        account: account.sanitized(),
        tokens: TokenResponse::new(access_token, state.auth.jwt.access_token_expiry_seconds()),
    }))
}

/// The resolved session, as the client sees it.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub account_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub primary_institution_id: Option<Uuid>,
    pub accessible_institution_ids: Vec<Uuid>,
    pub active_institution_id: Option<Uuid>,
    pub capabilities: Vec<String>,
}

/// GET /users/me
pub async fn me(ctx: RequestContext) -> Json<SessionResponse> {
    let mut capabilities: Vec<String> = ctx
        .capabilities
        .iter()
        .map(|c| format!("{}:{}", c.module, c.action))
        .collect();
    capabilities.sort();

    Json(SessionResponse {
        account_id: ctx.account_id,
        display_name: ctx.display_name,
        email: ctx.email,
        role: ctx.role.as_str().to_string(),
        primary_institution_id: ctx.primary_institution_id,
        accessible_institution_ids: ctx.accessible_institution_ids,
        active_institution_id: ctx.active_institution_id,
        capabilities,
    })
}
