use crate::error::{AppError, AppResult};
use crate::routes::types::HealthCheckResponse;
use axum::extract::State;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

use super::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let now = chrono::Utc::now();

    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        allowed_origins: state.cors_policy.origins().len(),
        uptime_seconds: now.signed_duration_since(state.started_at).num_seconds(),
        timestamp: now,
    };

    Ok(Json(response))
}

/// JSON 404 for unknown paths under `/api`, so CORS-enabled clients can read it
pub async fn api_not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
