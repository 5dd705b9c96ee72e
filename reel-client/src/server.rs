//! Introspection endpoints

use crate::AnimationClient;
use crate::error::{ClientError, Result};
use reel_core::dto::server::{ApiInfo, ServerStatus};

impl AnimationClient {
    /// Get the server status
    pub async fn status(&self) -> Result<ServerStatus> {
        let response = self.client.get(self.url("/status")).send().await?;
        self.handle_response(response).await
    }

    /// Get API information (name, version, endpoints)
    pub async fn info(&self) -> Result<ApiInfo> {
        let response = self.client.get(self.url("/")).send().await?;
        self.handle_response(response).await
    }

    /// Check that the server answers its health endpoint
    pub async fn health(&self) -> Result<()> {
        let response = self.client.get(self.url("/health")).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::api_error(status.as_u16(), "Health check failed"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::AnimationClient;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "running",
                "server_name": "Manim Animation Server",
                "platform": "linux",
                "version": "0.1.0",
                "temp_directory": "/tmp/manim_mcp",
                "latex": "disabled",
                "started_at": "2026-01-01T00:00:00Z",
                "available_endpoints": ["/generate_animation", "/validate_manim_code", "/status"],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let status = AnimationClient::new(server.uri()).status().await.unwrap();

        assert_eq!(status.status, "running");
        assert_eq!(status.temp_directory, "/tmp/manim_mcp");
        assert_eq!(status.available_endpoints.len(), 3);
    }

    #[tokio::test]
    async fn test_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Manim Animation Server",
                "version": "0.1.0",
                "description": "d",
                "endpoints": { "GET /": "API information" },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let info = AnimationClient::new(server.uri()).info().await.unwrap();

        assert_eq!(info.name, "Manim Animation Server");
        assert_eq!(info.endpoints["GET /"], "API information");
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        assert!(AnimationClient::new(server.uri()).health().await.is_ok());
    }

    #[tokio::test]
    async fn test_health_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = AnimationClient::new(server.uri()).health().await.unwrap_err();
        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = AnimationClient::new(format!("http://{}", addr))
            .status()
            .await
            .unwrap_err();
        assert!(err.is_unreachable());
    }
}
