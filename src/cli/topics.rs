//! CLI entry-point for inspecting the expanded topic vocabulary.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, nlp};

/// Args for the `topics` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Emit JSON instead of one line per topic.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let vocabulary = nlp::load_vocabulary(&settings)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&vocabulary)?);
        return Ok(());
    }
    for (topic, keywords) in vocabulary.iter() {
        println!("{topic} ({}): {}", keywords.len(), keywords.join(", "));
    }
    Ok(())
}
