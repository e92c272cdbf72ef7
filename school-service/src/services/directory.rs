//! Identity directory: the read-only lookups the resolver needs.
//!
//! Behind a trait so the middleware can be exercised against an
//! in-memory implementation in tests; production uses Postgres.

use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Account, Capability, Role};

#[async_trait]
pub trait Directory: Send + Sync {
    async fn find_account(&self, account_id: Uuid) -> Result<Option<Account>, AppError>;

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    /// Institution ids linked to the account via explicit grants.
    /// Links to institutions that no longer exist are filtered here,
    /// at read time.
    async fn linked_institution_ids(&self, account_id: Uuid) -> Result<Vec<Uuid>, AppError>;

    /// The system-wide active institution, if one is flagged.
    async fn system_active_institution_id(&self) -> Result<Option<Uuid>, AppError>;

    /// Capability set granted to a role.
    async fn role_capabilities(&self, role: Role) -> Result<HashSet<Capability>, AppError>;
}

/// PostgreSQL-backed directory.
#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn find_account(&self, account_id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, display_name, email, password_hash, role_code, status_code,
                   primary_institution_id, created_utc, updated_utc
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to load account: {}", e)))?;

        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, display_name, email, password_hash, role_code, status_code,
                   primary_institution_id, created_utc, updated_utc
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to load account: {}", e)))?;

        Ok(account)
    }

    async fn linked_institution_ids(&self, account_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        // Joined against institutions so stale links drop out.
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT l.institution_id
            FROM account_institution_links l
            JOIN institutions i ON i.institution_id = l.institution_id
            WHERE l.account_id = $1
            ORDER BY l.created_utc
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to load institution links: {}", e))
        })?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn system_active_institution_id(&self) -> Result<Option<Uuid>, AppError> {
        let id: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT institution_id
            FROM institutions
            WHERE is_system_active = TRUE
            ORDER BY created_utc
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Failed to load system active institution: {}",
                e
            ))
        })?;

        Ok(id.map(|(id,)| id))
    }

    async fn role_capabilities(&self, role: Role) -> Result<HashSet<Capability>, AppError> {
        let rows: Vec<Capability> = sqlx::query_as(
            r#"
            SELECT module, action
            FROM role_grants
            WHERE role_code = $1
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to load role grants: {}", e))
        })?;

        Ok(rows.into_iter().collect())
    }
}
