//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod local;
mod output;
mod render;
mod status;
mod validate;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Render a scene file through the server
    Render {
        /// Python file defining the scene class
        file: PathBuf,

        /// Where to write the video (default: <file stem>.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a scene file in-process, without a server
    Local {
        /// Python file defining the scene class
        file: PathBuf,

        /// Where to write the video (default: <file stem>.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the static checks on a scene file
    Validate {
        /// Python file to check
        file: PathBuf,

        /// Check locally instead of asking the server
        #[arg(long)]
        local: bool,
    },
    /// Show server status
    Status,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Render { file, output } => render::handle_render(config, &file, output).await,
        Commands::Local { file, output } => local::handle_local(&file, output).await,
        Commands::Validate { file, local } => {
            validate::handle_validate(config, &file, local).await
        }
        Commands::Status => status::handle_status(config).await,
    }
}
