//! Runtime configuration utilities for review-insights.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which embedding backend to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Deterministic feature-hashing vectors; no model download.
    Hashing,
    /// Pretrained sentence embeddings (requires the `embeddings` feature).
    Fastembed,
}

impl FromStr for EmbedderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
            .map_err(|_| anyhow::anyhow!("unknown embedder `{s}` (expected hashing or fastembed)"))
    }
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Root folder for exported analysis artefacts.
    pub outputs_dir: PathBuf,
    pub embedder: EmbedderKind,
    /// Output dimension of the hashing embedder.
    pub embedding_dim: usize,
    pub embedding_batch_size: usize,
    /// Smallest DBSCAN cluster kept; smaller groups become noise.
    pub min_cluster_size: usize,
    /// DBSCAN core-point neighbourhood size (at least 2).
    pub min_samples: usize,
    /// DBSCAN neighbourhood radius (Euclidean, on unit vectors).
    pub cluster_tolerance: f32,
    /// Clusters below this size get no keyword summary.
    pub keyword_min_cluster_size: usize,
    pub top_keywords: usize,
    pub max_features: usize,
    /// Optional JSON file of extra synonyms merged into the thesaurus.
    pub synonyms_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            outputs_dir: PathBuf::from("./outputs"),
            embedder: if cfg!(feature = "embeddings") {
                EmbedderKind::Fastembed
            } else {
                EmbedderKind::Hashing
            },
            embedding_dim: 384,
            embedding_batch_size: 64,
            min_cluster_size: 20,
            min_samples: 10,
            cluster_tolerance: 0.6,
            keyword_min_cluster_size: 5,
            top_keywords: 15,
            max_features: 2000,
            synonyms_path: None,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.outputs_dir);
        let embedder = match env::var("EMBEDDER") {
            Ok(raw) => raw.parse().context("parsing EMBEDDER")?,
            Err(_) => defaults.embedder,
        };

        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            outputs_dir,
            embedder,
            embedding_dim: env_or("EMBEDDING_DIM", defaults.embedding_dim),
            embedding_batch_size: env_or("EMBEDDING_BATCH_SIZE", defaults.embedding_batch_size),
            min_cluster_size: env_or("MIN_CLUSTER_SIZE", defaults.min_cluster_size),
            min_samples: env_or("MIN_SAMPLES", defaults.min_samples),
            cluster_tolerance: env_or("CLUSTER_TOLERANCE", defaults.cluster_tolerance),
            keyword_min_cluster_size: env_or(
                "KEYWORD_MIN_CLUSTER_SIZE",
                defaults.keyword_min_cluster_size,
            ),
            top_keywords: env_or("TOP_KEYWORDS", defaults.top_keywords),
            max_features: env_or("MAX_FEATURES", defaults.max_features),
            synonyms_path: env::var("SYNONYMS_PATH").ok().map(PathBuf::from),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
