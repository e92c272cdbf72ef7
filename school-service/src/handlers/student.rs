//! Student handlers, capability-gated and institution-scoped.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::RequestContext;
use crate::models::{CreateStudentRequest, Student};
use crate::AppState;

/// POST /students
pub async fn create_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    ctx.authorize("students", "create")?;
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

    let student = Student::new(institution_id, request.full_name, None);
    let created = state.db.create_student(&student).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /students
pub async fn list_students(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Student>>, AppError> {
    ctx.authorize("students", "read")?;

    let students = state.db.list_students(&ctx.institution_filter()).await?;
    Ok(Json(students))
}

/// GET /students/:student_id
pub async fn get_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    ctx.authorize("students", "read")?;

    let student = state
        .db
        .find_student(student_id, &ctx.institution_filter())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Student not found")))?;

    Ok(Json(student))
}
