//! Capability model - (module, action) pairs granted to roles.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::Role;

/// A single capability: permission to perform `action` within `module`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Capability {
    pub module: String,
    pub action: String,
}

impl Capability {
    pub fn new(module: &str, action: &str) -> Self {
        Self {
            module: module.to_string(),
            action: action.to_string(),
        }
    }
}

/// Role-to-capability grant row. Read-only at request time; mutated
/// only through the administration endpoints.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoleGrant {
    pub grant_id: Uuid,
    pub role_code: String,
    pub module: String,
    pub action: String,
}

impl RoleGrant {
    pub fn new(role_code: String, module: String, action: String) -> Self {
        Self {
            grant_id: Uuid::new_v4(),
            role_code,
            module,
            action,
        }
    }

    pub fn capability(&self) -> Capability {
        Capability {
            module: self.module.clone(),
            action: self.action.clone(),
        }
    }
}

/// Request to grant a capability to a role.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleGrantRequest {
    pub role: Role,
    #[validate(length(min = 1, message = "Module must not be empty"))]
    pub module: String,
    #[validate(length(min = 1, message = "Action must not be empty"))]
    pub action: String,
}
