//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod interview;

pub use interview::InterviewCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Interview management and processing
    Interview {
        #[command(subcommand)]
        command: InterviewCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Interview { command } => {
            interview::handle_interview_command(command, config).await
        }
    }
}
