//! Reel HTTP Client
//!
//! A type-safe HTTP client for the Reel render server.
//!
//! # Example
//!
//! ```no_run
//! use reel_client::AnimationClient;
//!
//! #[tokio::main]
//! async fn main() -> reel_client::Result<()> {
//!     let client = AnimationClient::new("http://localhost:8000");
//!
//!     let result = client
//!         .generate_animation("from manim import *\nclass GeneratedScene(Scene): ...")
//!         .await?;
//!
//!     println!("Rendered: {}", result.is_success());
//!     Ok(())
//! }
//! ```

pub mod error;
mod animations;
mod server;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the render server API
///
/// Endpoints are grouped as:
/// - Rendering and validation (`generate_animation`, `validate_code`)
/// - Introspection (`status`, `info`, `health`)
#[derive(Debug, Clone)]
pub struct AnimationClient {
    /// Base URL of the server (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl AnimationClient {
    /// Create a new client
    ///
    /// The default reqwest client has no request timeout, which suits renders
    /// that can take minutes. Use [`AnimationClient::with_client`] to bound it.
    ///
    /// # Example
    /// ```
    /// use reel_client::AnimationClient;
    ///
    /// let client = AnimationClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// # Example
    /// ```
    /// use reel_client::AnimationClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(330))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = AnimationClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Non-2xx responses become [`ClientError::ApiError`], using the server's
    /// `{"error": ...}` message when the body has one.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(
                status.as_u16(),
                error_message(&error_text),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Extracts `error` from a JSON error body, else returns the body as is
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
