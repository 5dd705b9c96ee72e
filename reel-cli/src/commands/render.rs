//! Render through the server

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

use crate::commands::output::{default_output, finish, read_scene};
use crate::config::Config;

pub async fn handle_render(config: &Config, file: &Path, output: Option<PathBuf>) -> Result<()> {
    let source = read_scene(file).await?;
    let output = output.unwrap_or_else(|| default_output(file));
    let client = config.client()?;

    println!(
        "{} {} via {}",
        "▸".cyan(),
        format!("Rendering {}", file.display()).bold(),
        client.base_url()
    );

    let result = client
        .generate_animation(source)
        .await
        .with_context(|| format!("Render request to {} failed", client.base_url()))?;

    finish(result, &output).await
}
