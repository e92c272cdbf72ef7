//! Grade recording and listing. Both operations resolve the student
//! through the caller's filter first, so grades for out-of-scope
//! students are unreachable.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::RequestContext;
use crate::models::{Grade, RecordGradeRequest};
use crate::services::InstitutionFilter;
use crate::AppState;

/// POST /students/:student_id/grades
pub async fn record_grade(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(student_id): Path<Uuid>,
    Json(request): Json<RecordGradeRequest>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    ctx.authorize("grades", "create")?;
    request.validate()?;

    let student = state
        .db
        .find_student(student_id, &ctx.institution_filter())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Student not found")))?;

    // The subject and grading window must belong to the student's own
    // institution; references into another institution read as missing.
    let scope = InstitutionFilter::Only(student.institution_id);
    state
        .db
        .find_subject(request.subject_id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subject not found")))?;
    state
        .db
        .find_grading_sub_period(request.sub_period_id, &scope)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Grading sub-period not found")))?;

    let grade = Grade::new(
        student_id,
        request.subject_id,
        request.sub_period_id,
        request.score,
        Some(ctx.account_id),
    );
    let created = state.db.record_grade(&grade).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /students/:student_id/grades
pub async fn list_grades(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<Grade>>, AppError> {
    ctx.authorize("grades", "read")?;

    state
        .db
        .find_student(student_id, &ctx.institution_filter())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Student not found")))?;

    let grades = state.db.list_grades(student_id).await?;
    Ok(Json(grades))
}
