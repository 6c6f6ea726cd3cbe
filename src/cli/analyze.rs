//! CLI entry-point for a one-shot analysis of a review export.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::{EmbedderKind, Settings},
    data::{
        export,
        reviews::{self, LoadOptions},
    },
    error::InputError,
    insights::render,
    nlp::Pipeline,
};

/// Args for the `analyze` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV export of reviews (needs `full_text` and `rating` columns).
    #[arg(long, short)]
    pub input: Option<PathBuf>,
    /// Only analyse reviews of this brand (`all` for every brand).
    #[arg(long)]
    pub brand: Option<String>,
    /// Override the configured embedding backend.
    #[arg(long, value_enum)]
    pub embedder: Option<EmbedderKind>,
    /// Override the smallest cluster kept.
    #[arg(long)]
    pub min_cluster_size: Option<usize>,
    /// Override the DBSCAN neighbourhood size.
    #[arg(long)]
    pub min_samples: Option<usize>,
    /// Override the DBSCAN neighbourhood radius.
    #[arg(long)]
    pub tolerance: Option<f32>,
    /// Output sub-folder name; defaults to the input file stem.
    #[arg(long)]
    pub name: Option<String>,
    /// Print the summary only, without writing artefacts.
    #[arg(long)]
    pub no_export: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    let input = args.input.clone().ok_or(InputError::MissingInput)?;
    if let Some(kind) = args.embedder {
        settings.embedder = kind;
    }
    if let Some(size) = args.min_cluster_size {
        settings.min_cluster_size = size;
    }
    if let Some(samples) = args.min_samples {
        settings.min_samples = samples;
    }
    if let Some(tolerance) = args.tolerance {
        settings.cluster_tolerance = tolerance;
    }

    let options = LoadOptions {
        brand: args.brand.clone(),
    };
    let loaded = reviews::load_reviews_from_path(&input, &options)
        .with_context(|| format!("loading {}", input.display()))?;
    let pipeline = Pipeline::from_settings(&settings)?;
    let report = tokio::task::spawn_blocking(move || pipeline.run(loaded)).await??;

    print!("{}", render::render_text(&report));

    if !args.no_export {
        let name = args.name.clone().unwrap_or_else(|| output_name(&input, args.brand.as_deref()));
        let dir = settings.join_output(name);
        let written = export::export_report(&report, &dir)?;
        info!(dir = %dir.display(), files = written.len(), "analysis exported");
        println!("\nArtefacts written to {}", dir.display());
    }
    Ok(())
}

fn output_name(input: &std::path::Path, brand: Option<&str>) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("reviews")
        .to_string();
    match brand.map(str::trim).filter(|b| !b.is_empty() && !b.eq_ignore_ascii_case("all")) {
        Some(brand) => format!("{stem}-{}", brand.to_lowercase().replace(' ', "_")),
        None => stem,
    }
}
