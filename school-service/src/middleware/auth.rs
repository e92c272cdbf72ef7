//! Identity and session resolution.
//!
//! Verifies the bearer credential, loads the account and its
//! institution entitlements, resolves the active institution, and
//! attaches an immutable [`RequestContext`] for the rest of the
//! request. Read-only: nothing here mutates persisted state.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::RequestContext;
use crate::services::{scope, Directory, JwtService, PreferredInstitution};

/// Preferred-institution header name.
pub const INSTITUTION_HEADER: &str = "x-institution-id";

/// The narrow slice of application state the resolver needs.
#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
    pub directory: Arc<dyn Directory>,
}

/// Middleware to require authentication and resolve the request scope.
pub async fn authenticate(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Unauthenticated(anyhow::anyhow!("Missing or invalid Authorization header"))
        })?;

    let claims = auth
        .jwt
        .validate_access_token(token)
        .map_err(|_| AppError::Unauthenticated(anyhow::anyhow!("Invalid or expired token")))?;

    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthenticated(anyhow::anyhow!("Malformed token subject")))?;

    let account = auth
        .directory
        .find_account(account_id)
        .await?
        .ok_or_else(|| AppError::AccountInactive("Account is not active".to_string()))?;

    if !account.is_active() {
        tracing::warn!(account_id = %account.account_id, status = %account.status_code, "Inactive account rejected");
        return Err(AppError::AccountInactive("Account is not active".to_string()));
    }

    let role = account.role().ok_or_else(|| {
        AppError::InternalError(anyhow::anyhow!(
            "Account {} carries unknown role code {}",
            account.account_id,
            account.role_code
        ))
    })?;

    // Accessible set: primary institution first, then explicit links.
    let links = auth.directory.linked_institution_ids(account_id).await?;
    let mut accessible: Vec<Uuid> = Vec::with_capacity(links.len() + 1);
    if let Some(primary) = account.primary_institution_id {
        accessible.push(primary);
    }
    for id in links {
        if !accessible.contains(&id) {
            accessible.push(id);
        }
    }

    let system_active = auth.directory.system_active_institution_id().await?;

    let preferred = PreferredInstitution::from_header(
        req.headers()
            .get(INSTITUTION_HEADER)
            .and_then(|v| v.to_str().ok()),
    );

    let active_institution_id = scope::select_active_institution(
        role,
        preferred,
        account.primary_institution_id,
        &accessible,
        system_active,
    );

    let capabilities = auth.directory.role_capabilities(role).await?;

    let context = RequestContext {
        account_id: account.account_id,
        display_name: account.display_name,
        email: account.email,
        role,
        primary_institution_id: account.primary_institution_id,
        accessible_institution_ids: accessible,
        active_institution_id,
        capabilities,
    };

    tracing::debug!(
        account_id = %context.account_id,
        role = %context.role.as_str(),
        active_institution = ?context.active_institution_id,
        "Request scope resolved"
    );

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}
