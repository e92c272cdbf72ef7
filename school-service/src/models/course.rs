//! Course and subject models. Subjects carry no institution column of
//! their own; they are scoped transitively through their course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Course entity (institution-scoped).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub course_id: Uuid,
    pub institution_id: Uuid,
    pub name: String,
    pub created_utc: DateTime<Utc>,
}

impl Course {
    pub fn new(institution_id: Uuid, name: String) -> Self {
        Self {
            course_id: Uuid::new_v4(),
            institution_id,
            name,
            created_utc: Utc::now(),
        }
    }
}

/// Subject entity, scoped through its course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub subject_id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub created_utc: DateTime<Utc>,
}

impl Subject {
    pub fn new(course_id: Uuid, name: String) -> Self {
        Self {
            subject_id: Uuid::new_v4(),
            course_id,
            name,
            created_utc: Utc::now(),
        }
    }
}

/// Request to create a course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub institution_id: Option<Uuid>,
}

/// Request to create a subject within a course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    pub course_id: Uuid,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}
