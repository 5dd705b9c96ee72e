//! Rendering and validation endpoints

use crate::AnimationClient;
use crate::error::Result;
use reel_core::domain::job::JobResult;
use reel_core::domain::validation::ValidationReport;
use reel_core::dto::job::RenderRequest;

impl AnimationClient {
    /// Render scene source on the server
    ///
    /// # Arguments
    /// * `manim_code` - Python source defining the scene class
    ///
    /// # Returns
    /// The job result. A failed render is `Ok(JobResult::Failure(..))`.
    pub async fn generate_animation(&self, manim_code: impl Into<String>) -> Result<JobResult> {
        let req = RenderRequest::new(manim_code);
        tracing::debug!("Requesting render of {} bytes", req.manim_code.len());

        let response = self
            .client
            .post(self.url("/generate_animation"))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Run the server's static checks without rendering
    pub async fn validate_code(&self, manim_code: impl Into<String>) -> Result<ValidationReport> {
        let req = RenderRequest::new(manim_code);
        let response = self
            .client
            .post(self.url("/validate_manim_code"))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
