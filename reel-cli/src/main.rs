//! Reel CLI
//!
//! Command-line interface for rendering Manim scenes, either through a
//! running render server or in-process.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "Render Manim animations", long_about = None)]
struct Cli {
    /// Render server URL
    #[arg(long, env = "REEL_SERVER_URL", default_value = "http://localhost:8000")]
    server_url: String,

    /// HTTP timeout in seconds for requests to the server
    #[arg(long, env = "REEL_REQUEST_TIMEOUT", default_value_t = 330)]
    request_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Executor logs matter for `reel local`; keep them on stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_executor=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
        request_timeout: Duration::from_secs(cli.request_timeout),
    };

    handle_command(cli.command, &config).await
}
