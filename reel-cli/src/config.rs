//! Configuration module
//!
//! Handles CLI configuration including the server URL.

use anyhow::{Context, Result};
use reel_client::AnimationClient;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the render server
    pub server_url: String,
    /// Ceiling on a single HTTP request, renders included
    pub request_timeout: Duration,
}

impl Config {
    /// Builds a client for the configured server
    pub fn client(&self) -> Result<AnimationClient> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(AnimationClient::with_client(&self.server_url, http))
    }
}
