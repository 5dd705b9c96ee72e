//! Render in-process
//!
//! Uses the same executor the server runs, configured from the same
//! `REEL_*` environment variables.

use anyhow::{Context, Result};
use colored::*;
use reel_executor::{ExecutionService, ExecutorConfig, ManimExecutionService};
use std::path::{Path, PathBuf};

use crate::commands::output::{default_output, finish, read_scene};

pub async fn handle_local(file: &Path, output: Option<PathBuf>) -> Result<()> {
    let source = read_scene(file).await?;
    let output = output.unwrap_or_else(|| default_output(file));

    let config = ExecutorConfig::from_env().context("Failed to load executor configuration")?;
    config
        .validate()
        .context("Invalid executor configuration")?;

    println!(
        "{} {} with {} (timeout {}s)",
        "▸".cyan(),
        format!("Rendering {}", file.display()).bold(),
        config.program,
        config.timeout.as_secs()
    );

    let service = ManimExecutionService::new(config);
    let result = service.execute(&source).await;

    finish(result, &output).await
}
