//! Execution service
//!
//! Handles one render job end to end:
//! - Sanitizing the scene source
//! - Creating the job's working directory
//! - Running the toolchain in the sandbox
//! - Locating and reading the produced video
//! - Classifying the outcome and removing the working directory
//!
//! Every path through `execute` yields a [`JobResult`]; nothing is raised.

use async_trait::async_trait;
use reel_core::domain::job::JobResult;
use reel_core::domain::validation::ValidationReport;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::classifier::Classifier;
use crate::config::ExecutorConfig;
use crate::job::Job;
use crate::locator;
use crate::sandbox::{ExecutionOutcome, Sandbox};
use crate::sanitizer;
use crate::validator;

/// Service trait for rendering scene source
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Renders `source` and returns the outcome
    ///
    /// # Arguments
    /// * `source` - Untrusted scene source defining the entry-point class
    ///
    /// # Returns
    /// A success carrying the encoded video, or a categorized failure
    async fn execute(&self, source: &str) -> JobResult;

    /// Runs the static checks on `source` without executing it
    fn validate(&self, source: &str) -> ValidationReport;

    /// Root under which job working directories are created
    fn temp_root(&self) -> &Path;
}

/// Renders scenes with the Manim toolchain
pub struct ManimExecutionService {
    config: ExecutorConfig,
    sandbox: Sandbox,
    classifier: Classifier,
}

impl ManimExecutionService {
    pub fn new(config: ExecutorConfig) -> Self {
        let classifier = Classifier::new(config.timeout, config.diagnostic_tail);
        Self {
            sandbox: Sandbox::new(config.clone()),
            classifier,
            config,
        }
    }

    /// Replaces the classifier, e.g. to use a custom marker table
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Runs the job and, on a clean exit, reads the newest video
    async fn render(&self, job: &Job) -> (ExecutionOutcome, Option<Vec<u8>>) {
        let outcome = self.sandbox.run(job.workdir(), job.source()).await;
        if !outcome.exited_cleanly() {
            return (outcome, None);
        }

        let media_dir = job.workdir().media_dir();
        let extension = self.config.media_extension.clone();
        let artifact = match tokio::task::spawn_blocking(move || {
            locator::find_latest(&media_dir, &extension)
        })
        .await
        {
            Ok(artifact) => artifact,
            Err(e) => {
                let message = format!("artifact lookup failed: {}", e);
                return (outcome.into_fault(message), None);
            }
        };

        let Some(artifact) = artifact else {
            debug!("Job {} produced no .{} file", job.id(), self.config.media_extension);
            return (outcome, None);
        };

        match tokio::fs::read(&artifact.path).await {
            Ok(bytes) => (outcome, Some(bytes)),
            Err(e) => {
                let message = format!("failed to read {}: {}", artifact.path.display(), e);
                (outcome.into_fault(message), None)
            }
        }
    }
}

#[async_trait]
impl ExecutionService for ManimExecutionService {
    async fn execute(&self, source: &str) -> JobResult {
        let sanitized = sanitizer::sanitize(source);

        let job = match Job::start(&self.config.temp_root, sanitized).await {
            Ok(job) => job,
            Err(e) => {
                error!("Failed to prepare job: {}", e);
                return self.classifier.internal_failure(&e.to_string()).into();
            }
        };

        info!(
            "Starting job {} at {}",
            job.id(),
            job.started_at().to_rfc3339()
        );

        let (outcome, video) = self.render(&job).await;
        let result = self.classifier.classify(&outcome, video.as_deref());

        let id = job.id().to_string();
        let elapsed = job.elapsed();
        job.finish().await;

        match &result {
            JobResult::Success(success) => info!(
                "Job {} succeeded in {:.2}s ({} bytes)",
                id, success.execution_time, success.video_size_bytes
            ),
            JobResult::Failure(failure) => warn!(
                "Job {} failed after {:.2}s: {} ({})",
                id,
                elapsed.as_secs_f64(),
                failure.error,
                failure.category
            ),
        }

        result
    }

    fn validate(&self, source: &str) -> ValidationReport {
        validator::validate(source, &self.config.entry_point)
    }

    fn temp_root(&self) -> &Path {
        &self.config.temp_root
    }
}
