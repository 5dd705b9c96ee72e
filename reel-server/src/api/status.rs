//! Introspection API Handlers

use axum::{Json, extract::State};
use reel_core::domain::job::LATEX_MODE;
use reel_core::dto::server::{ApiInfo, ServerStatus};

use crate::api::AppState;

pub const SERVER_NAME: &str = "Manim Animation Server";

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Endpoints reported by `GET /` with their descriptions
const ENDPOINTS: &[(&str, &str)] = &[
    ("POST /generate_animation", "Generate animation from Manim code"),
    ("POST /validate_manim_code", "Validate Manim code syntax"),
    ("GET /status", "Get server status"),
    ("GET /health", "Health check"),
    ("GET /", "API information"),
];

/// GET /status
pub async fn get_status(State(state): State<AppState>) -> Json<ServerStatus> {
    Json(ServerStatus {
        status: "running".to_string(),
        server_name: SERVER_NAME.to_string(),
        platform: std::env::consts::OS.to_string(),
        version: VERSION.to_string(),
        temp_directory: state.service.temp_root().display().to_string(),
        latex: LATEX_MODE.to_string(),
        started_at: state.started_at,
        available_endpoints: vec![
            "/generate_animation".to_string(),
            "/validate_manim_code".to_string(),
            "/status".to_string(),
        ],
    })
}

/// GET /
pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: SERVER_NAME.to_string(),
        version: VERSION.to_string(),
        description: "HTTP server for rendering Manim animations".to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(route, description)| (route.to_string(), description.to_string()))
            .collect(),
    })
}
