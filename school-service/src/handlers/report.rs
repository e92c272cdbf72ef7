//! Report card handler: scoped student lookup, then pure aggregation.
//! The capability gate for this route lives at the route level.

use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::middleware::RequestContext;
use crate::services::report::{build_report, ReportCard};
use crate::AppState;

/// GET /students/:student_id/report-card
pub async fn report_card(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ReportCard>, AppError> {
    let student = state
        .db
        .find_student(student_id, &ctx.institution_filter())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Student not found")))?;

    let rows = state.db.grade_rows_for_report(student_id).await?;
    let plan = state.db.weight_plan(student.institution_id).await?;

    Ok(Json(build_report(&rows, &plan)))
}
