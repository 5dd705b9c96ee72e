//! Job result domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution reported for every successful render (`-ql` quality)
pub const RESOLUTION: &str = "480p";

/// Math typesetting mode reported for every successful render
pub const LATEX_MODE: &str = "disabled";

/// Message attached to successful renders
pub const SUCCESS_MESSAGE: &str = "Animation generated successfully";

/// Coarse failure category of a render job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Timeout,
    TypesettingDependencyMissing,
    SyntaxError,
    MissingDependency,
    UndefinedReference,
    ArtifactMissing,
    Unknown,
    Internal,
}

impl ErrorCategory {
    /// Stable identifier, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::TypesettingDependencyMissing => "typesetting-dependency-missing",
            ErrorCategory::SyntaxError => "syntax-error",
            ErrorCategory::MissingDependency => "missing-dependency",
            ErrorCategory::UndefinedReference => "undefined-reference",
            ErrorCategory::ArtifactMissing => "artifact-missing",
            ErrorCategory::Unknown => "unknown",
            ErrorCategory::Internal => "internal",
        }
    }

    /// Human-readable error text for categories with a fixed message
    ///
    /// Timeouts and internal faults carry context (the bound, the fault) and
    /// are phrased by the classifier instead.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCategory::TypesettingDependencyMissing => {
                "LaTeX error - install LaTeX or simplify mathematical expressions"
            }
            ErrorCategory::SyntaxError => "Python syntax error in generated code",
            ErrorCategory::MissingDependency => "Missing Python module",
            ErrorCategory::UndefinedReference => "Undefined variable or function in code",
            ErrorCategory::ArtifactMissing => "Video file not found after execution",
            ErrorCategory::Timeout => "Animation timeout",
            ErrorCategory::Unknown => "Manim execution failed",
            ErrorCategory::Internal => "Unexpected error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered video
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSuccess {
    /// Base64-encoded video bytes
    pub video_data: String,
    /// Wall time of the render in seconds
    pub execution_time: f64,
    /// Size of the decoded video in bytes
    pub video_size_bytes: u64,
    pub resolution: String,
    pub latex: String,
    pub message: String,
}

impl RenderSuccess {
    /// Creates a success with the fixed render metadata
    pub fn new(video_data: String, execution_time: f64, video_size_bytes: u64) -> Self {
        Self {
            video_data,
            execution_time,
            video_size_bytes,
            resolution: RESOLUTION.to_string(),
            latex: LATEX_MODE.to_string(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// A failed render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFailure {
    pub category: ErrorCategory,
    /// Short human-readable diagnostic
    pub error: String,
    /// Tail of the captured standard error
    pub stderr: Option<String>,
    /// Captured standard output
    pub stdout: Option<String>,
}

impl RenderFailure {
    pub fn new(category: ErrorCategory, error: impl Into<String>) -> Self {
        Self {
            category,
            error: error.into(),
            stderr: None,
            stdout: None,
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }
}

/// Result of one render job
///
/// Serialized as a flat JSON object discriminated by the `success` flag:
///
/// ```json
/// {"success": true, "video_data": "...", "execution_time": 3.2, "video_size_bytes": 51234,
///  "resolution": "480p", "latex": "disabled", "message": "..."}
/// {"success": false, "error": "...", "category": "syntax-error", "stderr": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "JobResultWire", try_from = "JobResultWire")]
pub enum JobResult {
    Success(RenderSuccess),
    Failure(RenderFailure),
}

impl JobResult {
    pub fn is_success(&self) -> bool {
        matches!(self, JobResult::Success(_))
    }

    /// Failure category, `None` for successful jobs
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            JobResult::Success(_) => None,
            JobResult::Failure(failure) => Some(failure.category),
        }
    }

    pub fn as_success(&self) -> Option<&RenderSuccess> {
        match self {
            JobResult::Success(success) => Some(success),
            JobResult::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&RenderFailure> {
        match self {
            JobResult::Success(_) => None,
            JobResult::Failure(failure) => Some(failure),
        }
    }
}

impl From<RenderSuccess> for JobResult {
    fn from(success: RenderSuccess) -> Self {
        JobResult::Success(success)
    }
}

impl From<RenderFailure> for JobResult {
    fn from(failure: RenderFailure) -> Self {
        JobResult::Failure(failure)
    }
}

/// Flat wire representation of [`JobResult`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JobResultWire {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    execution_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    latex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<ErrorCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stdout: Option<String>,
}

impl From<JobResult> for JobResultWire {
    fn from(result: JobResult) -> Self {
        match result {
            JobResult::Success(s) => JobResultWire {
                success: true,
                video_data: Some(s.video_data),
                execution_time: Some(s.execution_time),
                video_size_bytes: Some(s.video_size_bytes),
                resolution: Some(s.resolution),
                latex: Some(s.latex),
                message: Some(s.message),
                error: None,
                category: None,
                stderr: None,
                stdout: None,
            },
            JobResult::Failure(f) => JobResultWire {
                success: false,
                video_data: None,
                execution_time: None,
                video_size_bytes: None,
                resolution: None,
                latex: None,
                message: None,
                error: Some(f.error),
                category: Some(f.category),
                stderr: f.stderr,
                stdout: f.stdout,
            },
        }
    }
}

impl TryFrom<JobResultWire> for JobResult {
    type Error = String;

    fn try_from(wire: JobResultWire) -> Result<Self, Self::Error> {
        if wire.success {
            let video_data = wire
                .video_data
                .ok_or_else(|| "successful result is missing 'video_data'".to_string())?;
            if wire.error.is_some() {
                return Err("successful result must not carry 'error'".to_string());
            }
            Ok(JobResult::Success(RenderSuccess {
                video_data,
                execution_time: wire.execution_time.unwrap_or_default(),
                video_size_bytes: wire.video_size_bytes.unwrap_or_default(),
                resolution: wire.resolution.unwrap_or_else(|| RESOLUTION.to_string()),
                latex: wire.latex.unwrap_or_else(|| LATEX_MODE.to_string()),
                message: wire.message.unwrap_or_else(|| SUCCESS_MESSAGE.to_string()),
            }))
        } else {
            let error = wire
                .error
                .ok_or_else(|| "failed result is missing 'error'".to_string())?;
            if wire.video_data.is_some() {
                return Err("failed result must not carry 'video_data'".to_string());
            }
            Ok(JobResult::Failure(RenderFailure {
                category: wire.category.unwrap_or(ErrorCategory::Unknown),
                error,
                stderr: wire.stderr,
                stdout: wire.stdout,
            }))
        }
    }
}
