//! Static scene validation
//!
//! Cheap checks run before (and independently of) rendering. Nothing is
//! executed: the source is parsed as a Python module and the resulting error,
//! if any, is reported with its line.

use reel_core::domain::validation::ValidationReport;
use rustpython_parser::{Mode, parse};
use thiserror::Error;

use crate::sanitizer::uses_typesetting;

const TYPESETTING_ADVICE: &str = "LaTeX not installed. Use Text() with Unicode symbols instead of MathTex() or Tex(). Example: Text('E=mc²') instead of MathTex(r'E=mc^2')";

const IMPORT_WARNING: &str = "Code should import from manim";

/// A parse error in Python source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line})")]
pub struct SyntaxIssue {
    pub message: String,
    pub line: usize,
}

impl SyntaxIssue {
    fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

/// Validates scene source without executing it
///
/// Checks, in order: Python syntax, LaTeX-backed calls, presence
/// of `class <entry_point>`. A missing `from manim import` only warns.
pub fn validate(source: &str, entry_point: &str) -> ValidationReport {
    if let Err(issue) = check_syntax(source) {
        return ValidationReport::invalid(format!("Syntax error: {}", issue));
    }

    if uses_typesetting(source) {
        return ValidationReport::invalid(TYPESETTING_ADVICE);
    }

    if !declares_class(source, entry_point) {
        return ValidationReport::invalid(format!(
            "Code must contain a class named '{}'",
            entry_point
        ));
    }

    let mut warnings = Vec::new();
    if !source.contains("from manim import") {
        warnings.push(IMPORT_WARNING.to_string());
    }

    ValidationReport::valid(warnings)
}

/// Whether a line starts with `class <name>` followed by `(` or `:`
fn declares_class(source: &str, name: &str) -> bool {
    source.lines().any(|line| {
        line.trim_start()
            .strip_prefix("class ")
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix(name))
            .is_some_and(|rest| {
                let rest = rest.trim_start();
                rest.starts_with('(') || rest.starts_with(':')
            })
    })
}

/// Parses `source` as a Python module
pub fn check_syntax(source: &str) -> Result<(), SyntaxIssue> {
    parse(source, Mode::Module, "<string>")
        .map(|_| ())
        .map_err(|err| {
            let offset = usize::from(err.offset).min(source.len());
            SyntaxIssue::new(err.error.to_string(), line_at(source, offset))
        })
}

/// 1-based line containing byte `offset`
fn line_at(source: &str, offset: usize) -> usize {
    source.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
