//! Institution model - the tenant boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Institution entity. At most one institution carries the
/// system-wide active flag at a time (business rule, maintained by
/// the administration endpoints).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Institution {
    pub institution_id: Uuid,
    pub display_name: String,
    pub is_system_active: bool,
    pub logo_path: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Institution {
    pub fn new(display_name: String) -> Self {
        Self {
            institution_id: Uuid::new_v4(),
            display_name,
            is_system_active: false,
            logo_path: None,
            created_utc: Utc::now(),
        }
    }
}

/// Account-to-institution access link, independent of the account's
/// primary institution.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AccountInstitutionLink {
    pub account_id: Uuid,
    pub institution_id: Uuid,
    pub created_utc: DateTime<Utc>,
}

/// Request to create an institution.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInstitutionRequest {
    #[validate(length(min = 1, message = "Display name must not be empty"))]
    pub display_name: String,
}

/// Institution response for API.
#[derive(Debug, Serialize)]
pub struct InstitutionResponse {
    pub institution_id: Uuid,
    pub display_name: String,
    pub is_system_active: bool,
    pub logo_path: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl From<Institution> for InstitutionResponse {
    fn from(i: Institution) -> Self {
        Self {
            institution_id: i.institution_id,
            display_name: i.display_name,
            is_system_active: i.is_system_active,
            logo_path: i.logo_path,
            created_utc: i.created_utc,
        }
    }
}
