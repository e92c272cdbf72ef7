//! Request-scoped authorization context.
//!
//! Built once by the resolver, inserted into request extensions, and
//! never mutated afterwards. Its lifetime is strictly one request.

use axum::{extract::FromRequestParts, http::request::Parts};
use service_core::error::AppError;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Capability, Role};
use crate::services::filter::{institution_filter, InstitutionFilter};

/// Everything downstream handlers may know about the caller.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub account_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    pub primary_institution_id: Option<Uuid>,
    /// Primary institution first, then explicit links, deduplicated.
    pub accessible_institution_ids: Vec<Uuid>,
    /// The single institution this request is scoped to, if any.
    pub active_institution_id: Option<Uuid>,
    pub capabilities: HashSet<Capability>,
}

impl RequestContext {
    /// Whether the caller holds a capability. Admin always passes.
    pub fn has_capability(&self, module: &str, action: &str) -> bool {
        if self.role == Role::Admin {
            return true;
        }
        self.capabilities
            .iter()
            .any(|c| c.module == module && c.action == action)
    }

    /// Capability gate usable at the top of a handler.
    pub fn authorize(&self, module: &str, action: &str) -> Result<(), AppError> {
        if self.has_capability(module, action) {
            Ok(())
        } else {
            tracing::warn!(
                account_id = %self.account_id,
                role = %self.role.as_str(),
                module,
                action,
                "Capability check failed"
            );
            Err(AppError::Forbidden(anyhow::anyhow!(
                "Missing permission: {}:{}",
                module,
                action
            )))
        }
    }

    /// The institution filter every scoped query for this request must
    /// apply.
    pub fn institution_filter(&self) -> InstitutionFilter {
        institution_filter(
            self.role,
            self.active_institution_id,
            &self.accessible_institution_ids,
        )
    }

    /// The active institution, or Forbidden when the request resolved
    /// to none (mutations require an explicit target institution).
    pub fn require_active_institution(&self) -> Result<Uuid, AppError> {
        self.active_institution_id.ok_or_else(|| {
            AppError::Forbidden(anyhow::anyhow!("No active institution for this request"))
        })
    }
}

/// Extractor for RequestContext from request extensions.
#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Request context missing from request extensions"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Role, caps: &[(&str, &str)]) -> RequestContext {
        RequestContext {
            account_id: Uuid::new_v4(),
            display_name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role,
            primary_institution_id: None,
            accessible_institution_ids: vec![],
            active_institution_id: None,
            capabilities: caps
                .iter()
                .map(|(m, a)| Capability::new(m, a))
                .collect(),
        }
    }

    #[test]
    fn test_admin_passes_any_capability() {
        let ctx = context(Role::Admin, &[]);
        assert!(ctx.has_capability("students", "delete"));
        assert!(ctx.authorize("anything", "at-all").is_ok());
    }

    #[test]
    fn test_capability_requires_exact_pair() {
        let ctx = context(Role::Secretary, &[("students", "read")]);
        assert!(ctx.has_capability("students", "read"));
        assert!(!ctx.has_capability("students", "create"));
        assert!(!ctx.has_capability("grades", "read"));
        assert!(ctx.authorize("students", "create").is_err());
    }
}
