//! Result classifier
//!
//! Maps an [`ExecutionOutcome`] and the located artifact to a [`JobResult`].
//! The toolchain exposes no structured error codes, so failed renders are
//! categorized by scanning stderr against an ordered marker table.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reel_core::domain::job::{ErrorCategory, JobResult, RenderFailure, RenderSuccess};
use std::time::Duration;

use crate::config::{DEFAULT_DIAGNOSTIC_TAIL, DEFAULT_TIMEOUT};
use crate::sandbox::{ExecutionOutcome, Termination};

/// Ordered `(marker, category)` pairs; the first marker found in stderr wins
pub const DEFAULT_MARKERS: &[(&str, ErrorCategory)] = &[
    ("LaTeX", ErrorCategory::TypesettingDependencyMissing),
    ("latex", ErrorCategory::TypesettingDependencyMissing),
    ("SyntaxError", ErrorCategory::SyntaxError),
    ("ImportError", ErrorCategory::MissingDependency),
    ("ModuleNotFoundError", ErrorCategory::MissingDependency),
    ("NameError", ErrorCategory::UndefinedReference),
];

/// Turns raw outcomes into job results
#[derive(Debug, Clone)]
pub struct Classifier {
    markers: Vec<(String, ErrorCategory)>,
    tail_chars: usize,
    timeout: Duration,
}

impl Classifier {
    /// Creates a classifier using [`DEFAULT_MARKERS`]
    ///
    /// # Arguments
    /// * `timeout` - The render timeout, named in timeout messages
    /// * `tail_chars` - Trailing characters of diagnostics kept in failures
    pub fn new(timeout: Duration, tail_chars: usize) -> Self {
        Self {
            markers: DEFAULT_MARKERS
                .iter()
                .map(|(marker, category)| (marker.to_string(), *category))
                .collect(),
            tail_chars,
            timeout,
        }
    }

    /// Replaces the marker table
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = (S, ErrorCategory)>,
        S: Into<String>,
    {
        self.markers = markers
            .into_iter()
            .map(|(marker, category)| (marker.into(), category))
            .collect();
        self
    }

    /// Category of the first marker present in `diagnostic`, else `Unknown`
    pub fn categorize(&self, diagnostic: &str) -> ErrorCategory {
        self.markers
            .iter()
            .find(|(marker, _)| diagnostic.contains(marker.as_str()))
            .map(|(_, category)| *category)
            .unwrap_or(ErrorCategory::Unknown)
    }

    /// Maps an outcome to a job result
    ///
    /// `artifact` holds the video bytes when the process exited cleanly and a
    /// file was found; it is ignored for every other outcome.
    pub fn classify(&self, outcome: &ExecutionOutcome, artifact: Option<&[u8]>) -> JobResult {
        match &outcome.termination {
            Termination::TimedOut => self.timeout_failure().into(),
            Termination::Faulted(fault) => self.internal_failure(fault).into(),
            Termination::Exited(0) => match artifact {
                Some(bytes) => self.success(bytes, outcome.elapsed).into(),
                None => RenderFailure::new(
                    ErrorCategory::ArtifactMissing,
                    ErrorCategory::ArtifactMissing.message(),
                )
                .with_stdout(tail(&outcome.stdout, self.tail_chars))
                .with_stderr(tail(&outcome.stderr, self.tail_chars))
                .into(),
            },
            Termination::Exited(_) => {
                let category = self.categorize(&outcome.stderr);
                RenderFailure::new(category, category.message())
                    .with_stderr(tail(&outcome.stderr, self.tail_chars))
                    .into()
            }
        }
    }

    /// Failure for a render that exceeded the timeout
    pub fn timeout_failure(&self) -> RenderFailure {
        RenderFailure::new(
            ErrorCategory::Timeout,
            format!(
                "Animation timeout (>{}). Try a simpler animation or reduce duration.",
                describe_duration(self.timeout)
            ),
        )
    }

    /// Failure for a fault while orchestrating the render
    pub fn internal_failure(&self, fault: &str) -> RenderFailure {
        RenderFailure::new(ErrorCategory::Internal, format!("Unexpected error: {}", fault))
    }

    fn success(&self, bytes: &[u8], elapsed: Duration) -> RenderSuccess {
        RenderSuccess::new(
            STANDARD.encode(bytes),
            elapsed.as_secs_f64(),
            bytes.len() as u64,
        )
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_DIAGNOSTIC_TAIL)
    }
}

/// Last `max_chars` characters of `text`
pub fn tail(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return "";
    }

    match text.char_indices().rev().nth(max_chars - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// "5 minutes", "1 minute", "90 seconds"
fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let minutes = secs / 60;
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else if secs >= 1 {
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    } else {
        format!("{} ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exited(code: i32, stdout: &str, stderr: &str) -> ExecutionOutcome {
        ExecutionOutcome {
            termination: Termination::Exited(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_marker_priority() {
        let classifier = Classifier::default();

        assert_eq!(
            classifier.categorize("SyntaxError near LaTeX"),
            ErrorCategory::TypesettingDependencyMissing
        );
        assert_eq!(
            classifier.categorize("ModuleNotFoundError ... NameError"),
            ErrorCategory::MissingDependency
        );
        assert_eq!(
            classifier.categorize("NameError: name 'x' is not defined"),
            ErrorCategory::UndefinedReference
        );
        assert_eq!(
            classifier.categorize("SyntaxError: '(' was never closed"),
            ErrorCategory::SyntaxError
        );
        assert_eq!(
            classifier.categorize("RuntimeError: latex failed"),
            ErrorCategory::TypesettingDependencyMissing
        );
        assert_eq!(classifier.categorize("Segmentation fault"), ErrorCategory::Unknown);
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        let classifier = Classifier::default();
        assert_eq!(classifier.categorize("nameerror"), ErrorCategory::Unknown);
        assert_eq!(classifier.categorize("LATEX"), ErrorCategory::Unknown);
    }

    #[test]
    fn test_custom_marker_table() {
        let classifier = Classifier::default()
            .with_markers([("IndentationError", ErrorCategory::SyntaxError)]);

        assert_eq!(
            classifier.categorize("IndentationError: unexpected indent"),
            ErrorCategory::SyntaxError
        );
        assert_eq!(classifier.categorize("NameError: x"), ErrorCategory::Unknown);
    }

    #[test]
    fn test_nonzero_exit_keeps_stderr_tail() {
        let classifier = Classifier::new(DEFAULT_TIMEOUT, 10);
        let stderr = format!("{}NameError!", "x".repeat(5000));

        let result = classifier.classify(&exited(1, "", &stderr), None);

        let failure = result.as_failure().unwrap();
        assert_eq!(failure.category, ErrorCategory::UndefinedReference);
        assert_eq!(failure.error, "Undefined variable or function in code");
        assert_eq!(failure.stderr.as_deref(), Some("NameError!"));
        assert_eq!(failure.stdout, None);
    }

    #[test]
    fn test_nonzero_exit_ignores_artifact() {
        let classifier = Classifier::default();
        let result = classifier.classify(&exited(2, "", "boom"), Some(b"video"));
        assert_eq!(result.category(), Some(ErrorCategory::Unknown));
    }

    #[test]
    fn test_clean_exit_without_artifact() {
        let classifier = Classifier::default();
        let result = classifier.classify(&exited(0, "rendered nothing", "warn"), None);

        let failure = result.as_failure().unwrap();
        assert_eq!(failure.category, ErrorCategory::ArtifactMissing);
        assert_eq!(failure.error, "Video file not found after execution");
        assert_eq!(failure.stdout.as_deref(), Some("rendered nothing"));
        assert_eq!(failure.stderr.as_deref(), Some("warn"));
    }

    #[test]
    fn test_clean_exit_with_artifact() {
        let classifier = Classifier::default();
        let result = classifier.classify(&exited(0, "", ""), Some(&[0, 1, 2, 3]));

        let success = result.as_success().unwrap();
        assert_eq!(success.video_data, "AAECAw==");
        assert_eq!(success.video_size_bytes, 4);
        assert_eq!(success.execution_time, 1.5);
        assert_eq!(success.resolution, "480p");
        assert_eq!(success.latex, "disabled");
    }

    #[test]
    fn test_timeout_message_names_bound() {
        let classifier = Classifier::default();
        let outcome = ExecutionOutcome {
            termination: Termination::TimedOut,
            stdout: String::new(),
            stderr: String::new(),
            elapsed: DEFAULT_TIMEOUT,
        };

        let result = classifier.classify(&outcome, None);
        let failure = result.as_failure().unwrap();
        assert_eq!(failure.category, ErrorCategory::Timeout);
        assert_eq!(
            failure.error,
            "Animation timeout (>5 minutes). Try a simpler animation or reduce duration."
        );
    }

    #[test]
    fn test_fault_is_internal() {
        let classifier = Classifier::default();
        let outcome = ExecutionOutcome::fault("permission denied", Duration::ZERO);

        let result = classifier.classify(&outcome, Some(b"ignored"));
        let failure = result.as_failure().unwrap();
        assert_eq!(failure.category, ErrorCategory::Internal);
        assert_eq!(failure.error, "Unexpected error: permission denied");
    }

    #[test]
    fn test_tail() {
        assert_eq!(tail("hello", 10), "hello");
        assert_eq!(tail("hello", 5), "hello");
        assert_eq!(tail("hello", 2), "lo");
        assert_eq!(tail("hello", 0), "");
        assert_eq!(tail("", 3), "");
        // Multi-byte characters are never split.
        assert_eq!(tail("aé€😀", 3), "é€😀");
        assert_eq!(tail("aé€😀", 1), "😀");
    }

    #[test]
    fn test_describe_duration() {
        assert_eq!(describe_duration(Duration::from_secs(300)), "5 minutes");
        assert_eq!(describe_duration(Duration::from_secs(60)), "1 minute");
        assert_eq!(describe_duration(Duration::from_secs(90)), "90 seconds");
        assert_eq!(describe_duration(Duration::from_secs(1)), "1 second");
        assert_eq!(describe_duration(Duration::from_millis(250)), "250 ms");
    }
}
