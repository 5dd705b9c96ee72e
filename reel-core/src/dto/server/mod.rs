//! Server DTOs
//!
//! Introspection responses of the render server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response of `GET /status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Always "running" when the server answers
    pub status: String,
    pub server_name: String,
    /// Operating system the server runs on
    pub platform: String,
    pub version: String,
    /// Root under which job working directories are created
    pub temp_directory: String,
    pub latex: String,
    pub started_at: DateTime<Utc>,
    pub available_endpoints: Vec<String>,
}

/// Response of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    /// "METHOD /path" -> description
    pub endpoints: BTreeMap<String, String>,
}
