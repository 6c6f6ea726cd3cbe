//! Review embeddings: a deterministic hashing backend and fastembed.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use anyhow::Result;
use tracing::info;

#[cfg(feature = "embeddings")]
use fastembed::TextEmbedding;

use crate::{
    config::{EmbedderKind, Settings},
    nlp::keywords::tokenize,
};

/// Anything that maps review texts to fixed-size vectors.
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;
    fn dimension(&self) -> usize;
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Signed feature hashing over unigrams and bigrams.
///
/// Reviews sharing vocabulary land close together, which is enough for
/// density clustering when no pretrained model is available.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dim];
        let tokens = tokenize(text);
        let bigrams = tokens.windows(2).map(|w| format!("{} {}", w[0], w[1]));
        for feature in tokens.iter().cloned().chain(bigrams) {
            let mut hasher = DefaultHasher::new();
            feature.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let sign = if (h >> 63) & 1 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }
        l2_normalize_in_place(&mut vector);
        vector
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Pretrained sentence embeddings via fastembed.
#[cfg(feature = "embeddings")]
pub struct FastEmbedder {
    model: std::sync::Mutex<TextEmbedding>,
    batch_size: usize,
    dim: usize,
}

#[cfg(feature = "embeddings")]
impl FastEmbedder {
    pub fn try_new(batch_size: usize) -> Result<Self> {
        let model = TextEmbedding::try_new(Default::default())?;
        Ok(Self {
            model: std::sync::Mutex::new(model),
            batch_size: batch_size.max(1),
            // Default model is all-MiniLM-L6-v2.
            dim: 384,
        })
    }
}

#[cfg(feature = "embeddings")]
impl Embedder for FastEmbedder {
    fn name(&self) -> &str {
        "fastembed"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let documents: Vec<&str> = texts.iter().map(String::as_str).collect();
        let mut model = self
            .model
            .lock()
            .map_err(|_| anyhow::anyhow!("embedding model lock poisoned"))?;
        let mut embeddings = model.embed(documents, Some(self.batch_size))?;
        for vector in &mut embeddings {
            l2_normalize_in_place(vector);
        }
        Ok(embeddings)
    }
}

/// Build the embedder requested by `settings`.
pub fn select_embedder(settings: &Settings) -> Result<Box<dyn Embedder>> {
    match settings.embedder {
        EmbedderKind::Hashing => Ok(Box::new(HashingEmbedder::new(settings.embedding_dim))),
        #[cfg(feature = "embeddings")]
        EmbedderKind::Fastembed => {
            info!("loading fastembed model");
            Ok(Box::new(FastEmbedder::try_new(settings.embedding_batch_size)?))
        }
        #[cfg(not(feature = "embeddings"))]
        EmbedderKind::Fastembed => {
            tracing::warn!("built without the `embeddings` feature; using hashing embedder");
            Ok(Box::new(HashingEmbedder::new(settings.embedding_dim)))
        }
    }
}

/// Scale `vector` to unit length; zero vectors are left untouched.
pub fn l2_normalize_in_place(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Embed every text, checking the backend returned one vector per review.
pub fn embed_reviews(embedder: &dyn Embedder, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    let embeddings = embedder.embed(texts)?;
    anyhow::ensure!(
        embeddings.len() == texts.len(),
        "{} returned {} vectors for {} reviews",
        embedder.name(),
        embeddings.len(),
        texts.len()
    );
    info!(
        embedder = embedder.name(),
        rows = embeddings.len(),
        dim = embedder.dimension(),
        "computed review embeddings"
    );
    Ok(embeddings)
}
