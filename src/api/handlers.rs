//! Axum handlers for the studio endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use super::errors::ApiError;
use super::operations;
use super::request::{GenerateImageRequest, RewriteRequest, TreatmentRequest};
use super::response::{GenerateImageResponse, RewriteResponse, TreatmentResponse};
use super::AppState;

/// POST /api/director - Generate a director's treatment from a concept
pub async fn treatment_handler(
    State(state): State<AppState>,
    payload: Result<Json<TreatmentRequest>, JsonRejection>,
) -> Result<Json<TreatmentResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    operations::generate_treatment(&state.studio, &request).await.map(Json)
}

/// POST /api/rewrite - Rewrite a prompt for gritty realism
pub async fn rewrite_handler(
    State(state): State<AppState>,
    payload: Result<Json<RewriteRequest>, JsonRejection>,
) -> Result<Json<RewriteResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    operations::rewrite_prompt(&state.studio, &request).await.map(Json)
}

/// POST /api/generate - Render an image from a prompt and references
pub async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Json<GenerateImageResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    operations::generate_image(&state.studio, &request).await.map(Json)
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let profiles = state.studio.profiles();
    Json(json!({
        "status": "ok",
        "textModel": profiles.director.model,
        "imageModel": profiles.image.model,
    }))
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    tracing::warn!("rejected request body: {}", rejection.body_text());
    ApiError::invalid_input(format!("Invalid request body: {}", rejection.body_text()))
}
