//! Animation API Handlers
//!
//! Render and validation endpoints. Both answer 200 for every handled
//! outcome, including failed renders and invalid code.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use reel_core::domain::job::JobResult;
use reel_core::domain::validation::ValidationReport;
use reel_core::dto::job::RenderRequest;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

fn parse_request(payload: Result<Json<RenderRequest>, JsonRejection>) -> ApiResult<RenderRequest> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// POST /generate_animation
/// Render scene source to a video
pub async fn generate_animation(
    State(state): State<AppState>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> ApiResult<Json<JobResult>> {
    let req = parse_request(payload)?;
    tracing::info!("Render requested ({} bytes of source)", req.manim_code.len());

    // Run on its own task so a panic inside the job becomes a 500 here
    // instead of tearing down the connection.
    let service = state.service.clone();
    let result = tokio::spawn(async move { service.execute(&req.manim_code).await }).await?;

    Ok(Json(result))
}

/// POST /validate_manim_code
/// Static checks without rendering
pub async fn validate_code(
    State(state): State<AppState>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> ApiResult<Json<ValidationReport>> {
    let req = parse_request(payload)?;
    tracing::debug!("Validating {} bytes of source", req.manim_code.len());

    Ok(Json(state.service.validate(&req.manim_code)))
}
