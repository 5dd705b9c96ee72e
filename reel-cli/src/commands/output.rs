//! Shared rendering of job results
//!
//! Both `render` and `local` end here: a success is decoded and written to
//! disk, a failure is printed and turned into a non-zero exit.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use colored::*;
use reel_core::domain::job::{JobResult, RenderFailure, RenderSuccess};
use std::path::{Path, PathBuf};

/// Lines of diagnostics shown for a failed render
const DIAGNOSTIC_LINES: usize = 15;

/// Reads a scene file
pub async fn read_scene(file: &Path) -> Result<String> {
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))
}

/// `<file stem>.mp4` in the current directory
pub fn default_output(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "animation".to_string());
    PathBuf::from(format!("{}.mp4", stem))
}

/// Writes a success to disk or reports a failure as an error
pub async fn finish(result: JobResult, output: &Path) -> Result<()> {
    match result {
        JobResult::Success(success) => save_video(&success, output).await,
        JobResult::Failure(failure) => {
            print_failure(&failure);
            anyhow::bail!("Render failed ({})", failure.category)
        }
    }
}

async fn save_video(success: &RenderSuccess, output: &Path) -> Result<()> {
    let bytes = STANDARD
        .decode(&success.video_data)
        .context("Server returned invalid base64 video data")?;

    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{} {}", "✓".green(), success.message.bold());
    println!("  Output:     {}", output.display().to_string().cyan());
    println!("  Size:       {}", format_size(success.video_size_bytes));
    println!("  Time:       {:.2}s", success.execution_time);
    println!("  Resolution: {}", success.resolution);

    Ok(())
}

fn print_failure(failure: &RenderFailure) {
    println!("{} {}", "✗".red(), failure.error.bold());
    println!("  Category: {}", failure.category.as_str().yellow());

    for (label, text) in [("stderr", &failure.stderr), ("stdout", &failure.stdout)] {
        let Some(text) = text.as_deref().filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        println!();
        println!("{}", format!("Last {} lines of {}:", DIAGNOSTIC_LINES, label).dimmed());
        println!("{}", "─".repeat(80).dimmed());
        for line in last_lines(text, DIAGNOSTIC_LINES) {
            println!("  {}", line);
        }
        println!("{}", "─".repeat(80).dimmed());
    }
}

fn last_lines(text: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(count)..].to_vec()
}

/// Human-readable byte size
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f >= KIB * KIB {
        format!("{:.1} MiB", bytes_f / (KIB * KIB))
    } else if bytes_f >= KIB {
        format!("{:.1} KiB", bytes_f / KIB)
    } else {
        format!("{} B", bytes)
    }
}
