//! Permission gates: role allow-lists and capability checks, applied
//! at the route level after identity resolution.

use axum::{extract::Request, middleware::Next, response::Response};
use service_core::error::AppError;
use std::future::Future;
use std::pin::Pin;

use crate::middleware::RequestContext;
use crate::models::Role;

type GateFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

/// Route-level role gate. Always an allow-list.
///
/// ```ignore
/// .layer(middleware::from_fn(require_roles(&[Role::Admin])))
/// ```
pub fn require_roles(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> GateFuture + Clone + Send + 'static {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let ctx = req.extensions().get::<RequestContext>().ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Request context missing from request extensions"
                ))
            })?;

            if !allowed.contains(&ctx.role) {
                tracing::warn!(
                    account_id = %ctx.account_id,
                    role = %ctx.role.as_str(),
                    allowed = ?allowed,
                    "Role not allowed for this route"
                );
                return Err(AppError::Forbidden(anyhow::anyhow!(
                    "Role not allowed for this operation"
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// Route-level capability gate over a (module, action) pair. Admin
/// always passes.
pub fn require_capability(
    module: &'static str,
    action: &'static str,
) -> impl Fn(Request, Next) -> GateFuture + Clone + Send + 'static {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let ctx = req.extensions().get::<RequestContext>().ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Request context missing from request extensions"
                ))
            })?;

            ctx.authorize(module, action)?;

            Ok(next.run(req).await)
        })
    }
}
