pub mod auth;
pub mod context;
pub mod permission;

pub use auth::{authenticate, AuthState, INSTITUTION_HEADER};
pub use context::RequestContext;
pub use permission::{require_capability, require_roles};
