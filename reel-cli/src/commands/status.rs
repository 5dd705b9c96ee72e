//! Status command handler

use anyhow::Result;
use colored::*;

use crate::config::Config;

pub async fn handle_status(config: &Config) -> Result<()> {
    let client = config.client()?;
    let status = client.status().await?;

    let state = if status.status == "running" {
        status.status.green()
    } else {
        status.status.red()
    };

    println!("{} {}", "▸".cyan(), status.server_name.bold());
    println!("  URL:         {}", client.base_url());
    println!("  Status:      {}", state);
    println!("  Version:     {}", status.version);
    println!("  Platform:    {}", status.platform);
    println!("  Temp dir:    {}", status.temp_directory);
    println!("  LaTeX:       {}", status.latex);
    println!(
        "  Started:     {}",
        status.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Endpoints:");
    for endpoint in &status.available_endpoints {
        println!("    {}", endpoint.dimmed());
    }

    Ok(())
}
