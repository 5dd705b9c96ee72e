//! Validate command handler

use anyhow::Result;
use colored::*;
use reel_core::domain::validation::ValidationReport;
use reel_executor::ExecutorConfig;
use reel_executor::validator;
use std::path::Path;

use crate::commands::output::read_scene;
use crate::config::Config;

pub async fn handle_validate(config: &Config, file: &Path, local: bool) -> Result<()> {
    let source = read_scene(file).await?;

    let report = if local {
        validator::validate(&source, &ExecutorConfig::default().entry_point)
    } else {
        config.client()?.validate_code(source).await?
    };

    print_report(file, &report);

    if !report.valid {
        anyhow::bail!("{} is not valid", file.display());
    }
    Ok(())
}

fn print_report(file: &Path, report: &ValidationReport) {
    if report.valid {
        let message = report.message.as_deref().unwrap_or("Code is valid");
        println!("{} {}: {}", "✓".green(), file.display(), message);
    } else {
        let error = report.error.as_deref().unwrap_or("Code is invalid");
        println!("{} {}: {}", "✗".red(), file.display(), error.red());
    }

    for warning in &report.warnings {
        println!("  {} {}", "⚠".yellow(), warning.yellow());
    }
}
