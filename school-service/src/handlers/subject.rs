//! Subject handlers. Subjects scope through their parent course, so
//! every operation first proves the course is visible to the caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::RequestContext;
use crate::models::{CreateSubjectRequest, Subject};
use crate::AppState;

/// POST /subjects
pub async fn create_subject(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    ctx.authorize("subjects", "create")?;
    request.validate()?;

    // A course outside the caller's scope reads as missing.
    state
        .db
        .find_course(request.course_id, &ctx.institution_filter())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Course not found")))?;

    let subject = Subject::new(request.course_id, request.name);
    let created = state.db.create_subject(&subject).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Subject>>, AppError> {
    ctx.authorize("subjects", "read")?;

    let subjects = state.db.list_subjects(&ctx.institution_filter()).await?;
    Ok(Json(subjects))
}

/// GET /subjects/:subject_id
pub async fn get_subject(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<Subject>, AppError> {
    ctx.authorize("subjects", "read")?;

    let subject = state
        .db
        .find_subject(subject_id, &ctx.institution_filter())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subject not found")))?;

    Ok(Json(subject))
}
