use axum::{extract::State, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

use crate::AppState;

/// Liveness probe. Does not touch the database.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
    }))
}

/// Readiness probe: verifies the database connection.
pub async fn readiness(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.db.health_check().await?;

    Ok(Json(json!({
        "status": "ready",
        "service": state.config.service_name,
    })))
}
