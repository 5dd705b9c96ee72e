//! Validation domain types

use serde::{Deserialize, Serialize};

/// Advisory report produced by static checks on scene source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationReport {
    /// A passing report with the given warnings
    pub fn valid(warnings: Vec<String>) -> Self {
        Self {
            valid: true,
            error: None,
            warnings,
            message: Some("Code syntax is valid".to_string()),
        }
    }

    /// A failing report
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            warnings: Vec::new(),
            message: None,
        }
    }
}
