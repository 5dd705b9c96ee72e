//! Job DTOs

use serde::{Deserialize, Serialize};

/// Body of `POST /generate_animation` and `POST /validate_manim_code`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Python source defining the `GeneratedScene` class
    pub manim_code: String,
}

impl RenderRequest {
    pub fn new(manim_code: impl Into<String>) -> Self {
        Self {
            manim_code: manim_code.into(),
        }
    }
}
