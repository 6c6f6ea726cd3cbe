//! CLI entry-point for the local upload API and HTML report.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    api,
    config::{EmbedderKind, Settings},
};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind (default 8080).
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
    /// Host address, defaults to localhost.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Embedding backend used for every upload.
    #[arg(long, value_enum)]
    pub embedder: Option<EmbedderKind>,
    /// Largest accepted CSV upload, in MiB.
    #[arg(long)]
    pub max_upload_mb: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    if let Some(kind) = args.embedder {
        settings.embedder = kind;
    }
    if let Some(mb) = args.max_upload_mb {
        settings.max_upload_bytes = upload_limit_bytes(mb);
    }
    info!(
        embedder = ?settings.embedder,
        max_upload_bytes = settings.max_upload_bytes,
        "starting review server"
    );
    api::serve(settings, args.host, args.port).await
}

/// MiB to bytes, at least one MiB and capped at `usize::MAX`.
fn upload_limit_bytes(mb: usize) -> usize {
    mb.max(1).saturating_mul(1024 * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_limit_saturates() {
        assert_eq!(upload_limit_bytes(0), 1024 * 1024);
        assert_eq!(upload_limit_bytes(20), 20 * 1024 * 1024);
        assert_eq!(upload_limit_bytes(usize::MAX), usize::MAX);
    }
}
