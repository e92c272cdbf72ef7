//! Grade and grading-window models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A single recorded score for a student/subject/sub-period.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Grade {
    pub grade_id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub sub_period_id: Uuid,
    pub score: f64,
    pub recorded_by: Option<Uuid>,
    pub created_utc: DateTime<Utc>,
}

impl Grade {
    pub fn new(
        student_id: Uuid,
        subject_id: Uuid,
        sub_period_id: Uuid,
        score: f64,
        recorded_by: Option<Uuid>,
    ) -> Self {
        Self {
            grade_id: Uuid::new_v4(),
            student_id,
            subject_id,
            sub_period_id,
            score,
            recorded_by,
            created_utc: Utc::now(),
        }
    }
}

/// Grading period (institution-scoped), weighted as a percentage of
/// the overall average.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GradingPeriod {
    pub period_id: Uuid,
    pub institution_id: Uuid,
    pub name: String,
    pub weight_percent: f64,
    pub sort_order: i32,
}

impl GradingPeriod {
    pub fn new(institution_id: Uuid, name: String, weight_percent: f64, sort_order: i32) -> Self {
        Self {
            period_id: Uuid::new_v4(),
            institution_id,
            name,
            weight_percent,
            sort_order,
        }
    }
}

/// Sub-period within a grading period, weighted as a percentage of
/// the period average.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GradingSubPeriod {
    pub sub_period_id: Uuid,
    pub period_id: Uuid,
    pub name: String,
    pub weight_percent: f64,
    pub sort_order: i32,
}

impl GradingSubPeriod {
    pub fn new(period_id: Uuid, name: String, weight_percent: f64, sort_order: i32) -> Self {
        Self {
            sub_period_id: Uuid::new_v4(),
            period_id,
            name,
            weight_percent,
            sort_order,
        }
    }
}

/// Request to add a grading window (period or sub-period).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGradingWindowRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0.0, max = 100.0, message = "Weight must be between 0 and 100"))]
    pub weight_percent: f64,
    #[serde(default)]
    pub sort_order: i32,
}

/// Request to record a grade.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordGradeRequest {
    pub subject_id: Uuid,
    pub sub_period_id: Uuid,
    #[validate(range(min = 0.0, max = 10.0, message = "Score must be between 0 and 10"))]
    pub score: f64,
}
