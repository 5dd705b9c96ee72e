//! API Module
//!
//! HTTP boundary of the render server. Handlers hold no job state of their
//! own; everything goes through the shared [`ExecutionService`].

pub mod animation;
pub mod error;
pub mod health;
pub mod status;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use reel_executor::ExecutionService;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn ExecutionService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: Arc<dyn ExecutionService>) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Introspection
        .route("/", get(status::api_info))
        .route("/health", get(health::health_check))
        .route("/status", get(status::get_status))
        // Rendering
        .route("/generate_animation", post(animation::generate_animation))
        .route("/validate_manim_code", post(animation::validate_code))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use reel_core::domain::job::{ErrorCategory, JobResult, RenderFailure, RenderSuccess};
    use reel_core::domain::validation::ValidationReport;
    use serde_json::{Value, json};
    use std::path::{Path, PathBuf};
    use tower::ServiceExt;

    /// Answers by looking for keywords in the source
    struct StubService {
        root: PathBuf,
    }

    #[async_trait]
    impl ExecutionService for StubService {
        async fn execute(&self, source: &str) -> JobResult {
            if source.contains("panic") {
                panic!("stub render exploded");
            }
            if source.contains("ok") {
                RenderSuccess::new("AAEC".to_string(), 0.5, 3).into()
            } else {
                RenderFailure::new(
                    ErrorCategory::UndefinedReference,
                    ErrorCategory::UndefinedReference.message(),
                )
                .with_stderr("NameError: name 'x' is not defined")
                .into()
            }
        }

        fn validate(&self, source: &str) -> ValidationReport {
            if source.is_empty() {
                ValidationReport::invalid("empty")
            } else {
                ValidationReport::valid(vec!["Code should import from manim".to_string()])
            }
        }

        fn temp_root(&self) -> &Path {
            &self.root
        }
    }

    fn app() -> Router {
        let service = Arc::new(StubService {
            root: PathBuf::from("/tmp/manim_mcp"),
        });
        create_router(AppState::new(service))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let (status, bytes) = send(Request::get(uri).body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (status, body) = post_json("/generate_animation", json!({ "manim_code": "ok" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["video_data"], json!("AAEC"));
        assert_eq!(body["video_size_bytes"], json!(3));
        assert_eq!(body["resolution"], json!("480p"));
    }

    #[tokio::test]
    async fn test_failed_render_is_still_200() {
        let (status, body) =
            post_json("/generate_animation", json!({ "manim_code": "x" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["category"], json!("undefined-reference"));
        assert_eq!(body["error"], json!("Undefined variable or function in code"));
        assert!(body["stderr"].as_str().unwrap().contains("NameError"));
    }

    #[tokio::test]
    async fn test_panicking_job_is_500() {
        let (status, body) =
            post_json("/generate_animation", json!({ "manim_code": "panic" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!("Render task panicked"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let (status, body) = post_json("/generate_animation", json!({ "code": "ok" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_validate() {
        let (status, body) =
            post_json("/validate_manim_code", json!({ "manim_code": "class A: pass" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], json!(true));
        assert_eq!(body["warnings"], json!(["Code should import from manim"]));
        assert_eq!(body["message"], json!("Code syntax is valid"));

        let (status, body) = post_json("/validate_manim_code", json!({ "manim_code": "" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], json!(false));
        assert_eq!(body["error"], json!("empty"));
    }

    #[tokio::test]
    async fn test_status() {
        let (status, body) = get_json("/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("running"));
        assert_eq!(body["server_name"], json!("Manim Animation Server"));
        assert_eq!(body["temp_directory"], json!("/tmp/manim_mcp"));
        assert_eq!(body["latex"], json!("disabled"));
        assert_eq!(body["platform"], json!(std::env::consts::OS));
        assert_eq!(
            body["available_endpoints"],
            json!(["/generate_animation", "/validate_manim_code", "/status"])
        );
    }

    #[tokio::test]
    async fn test_api_info() {
        let (status, body) = get_json("/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!("Manim Animation Server"));
        assert!(body["endpoints"]["POST /generate_animation"].is_string());
        assert!(body["endpoints"]["GET /"].is_string());
    }
}
