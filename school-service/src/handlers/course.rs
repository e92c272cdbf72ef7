//! Course handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::RequestContext;
use crate::models::{Course, CreateCourseRequest};
use crate::AppState;

/// POST /courses
pub async fn create_course(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    ctx.authorize("courses", "create")?;
    request.validate()?;

    let institution_id = request
        .institution_id
        .map(Ok)
        .unwrap_or_else(|| ctx.require_active_institution())?;

    if !ctx.institution_filter().allows(institution_id) {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Institution outside the caller's scope"
        )));
    }

    let course = Course::new(institution_id, request.name);
    let created = state.db.create_course(&course).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /courses
pub async fn list_courses(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Course>>, AppError> {
    ctx.authorize("courses", "read")?;

    let courses = state.db.list_courses(&ctx.institution_filter()).await?;
    Ok(Json(courses))
}

/// GET /courses/:course_id
pub async fn get_course(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    ctx.authorize("courses", "read")?;

    let course = state
        .db
        .find_course(course_id, &ctx.institution_filter())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Course not found")))?;

    Ok(Json(course))
}
