//! Account model - platform users across every institution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Closed set of roles an account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Guardian,
    Secretary,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Guardian => "guardian",
            Role::Secretary => "secretary",
        }
    }

    pub fn parse(code: &str) -> Option<Role> {
        match code {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            "guardian" => Some(Role::Guardian),
            "secretary" => Some(Role::Secretary),
            _ => None,
        }
    }
}

/// Account state codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Suspended => "suspended",
        }
    }
}

/// Account entity.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub account_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role_code: String,
    pub status_code: String,
    pub primary_institution_id: Option<Uuid>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Account {
    pub fn new(
        display_name: String,
        email: String,
        password_hash: String,
        role: Role,
        primary_institution_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            account_id: Uuid::new_v4(),
            display_name,
            email,
            password_hash,
            role_code: role.as_str().to_string(),
            status_code: AccountStatus::Active.as_str().to_string(),
            primary_institution_id,
            created_utc: now,
            updated_utc: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status_code == AccountStatus::Active.as_str()
    }

    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role_code)
    }

    /// Convert to sanitized response (no password hash).
    pub fn sanitized(&self) -> AccountResponse {
        AccountResponse::from(self.clone())
    }
}

/// Request to create an account. Student-role accounts also carry the
/// student's full name for the satellite row.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "Display name must not be empty"))]
    pub display_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
    pub primary_institution_id: Option<Uuid>,
    pub student_full_name: Option<String>,
}

/// Request to login with email/password.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
}

/// Account response for API (without sensitive fields).
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub account_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub primary_institution_id: Option<Uuid>,
    pub created_utc: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            account_id: a.account_id,
            display_name: a.display_name,
            email: a.email,
            role: a.role_code,
            status: a.status_code,
            primary_institution_id: a.primary_institution_id,
            created_utc: a.created_utc,
        }
    }
}

/// Token response after successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn new(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Auth response with account info and token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub account: AccountResponse,
    pub tokens: TokenResponse,
}
