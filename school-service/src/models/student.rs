//! Student model - institution-scoped student records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Student entity (institution-scoped).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub student_id: Uuid,
    pub account_id: Option<Uuid>,
    pub institution_id: Uuid,
    pub full_name: String,
    pub created_utc: DateTime<Utc>,
}

impl Student {
    pub fn new(institution_id: Uuid, full_name: String, account_id: Option<Uuid>) -> Self {
        Self {
            student_id: Uuid::new_v4(),
            account_id,
            institution_id,
            full_name,
            created_utc: Utc::now(),
        }
    }
}

/// Request to create a student.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: String,
    pub institution_id: Option<Uuid>,
}
