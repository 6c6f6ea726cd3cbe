//! Command-line interface wiring for review-insights.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::config::Settings;

pub mod analyze;
pub mod serve;
pub mod topics;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Customer review insights", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => analyze::run(args, settings).await,
            Commands::Topics(args) => topics::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Tag, cluster and summarise a review export.
    Analyze(analyze::Args),
    /// Show the expanded keyword list of every topic.
    Topics(topics::Args),
    /// Serve the upload endpoint, JSON summaries and HTML report.
    Serve(serve::Args),
}
