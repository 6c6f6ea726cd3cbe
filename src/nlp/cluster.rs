//! Density-based clustering of review embeddings.

use std::{collections::HashMap, fmt};

use anyhow::{ensure, Context, Result};
use linfa::prelude::*;
use linfa_clustering::Dbscan;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Cluster label; `-1` marks noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub i64);

impl ClusterId {
    pub const NOISE: Self = ClusterId(-1);

    pub fn is_noise(&self) -> bool {
        *self == Self::NOISE
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Smallest neighbourhood size linfa's DBSCAN accepts.
pub const MIN_DBSCAN_SAMPLES: usize = 2;

/// DBSCAN hyper-parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Groups smaller than this after DBSCAN are demoted to noise.
    pub min_cluster_size: usize,
    /// Neighbourhood size for a core point; values below 2 are raised to 2.
    pub min_samples: usize,
    /// Neighbourhood radius.
    pub tolerance: f32,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            min_cluster_size: 20,
            min_samples: 10,
            tolerance: 0.6,
        }
    }
}

/// Assign a cluster id to every embedding row.
pub fn cluster_embeddings(embeddings: &[Vec<f32>], params: &ClusterParams) -> Result<Vec<ClusterId>> {
    let rows = embeddings.len();
    let Some(first) = embeddings.first() else {
        return Ok(Vec::new());
    };
    let dim = first.len();
    ensure!(dim > 0, "embeddings have zero dimension");
    ensure!(
        embeddings.iter().all(|e| e.len() == dim),
        "embeddings have inconsistent dimensions"
    );

    // DBSCAN needs a core point plus at least one neighbour.
    let min_samples = params.min_samples.max(MIN_DBSCAN_SAMPLES);
    if rows < min_samples {
        debug!(rows, min_samples, "too few reviews to form clusters");
        return Ok(vec![ClusterId::NOISE; rows]);
    }
    let flat: Vec<f32> = embeddings.iter().flatten().copied().collect();
    let data = Array2::from_shape_vec((rows, dim), flat).context("reshaping embeddings")?;

    let labels: Array1<Option<usize>> = Dbscan::params(min_samples)
        .tolerance(params.tolerance)
        .transform(&data)
        .context("running dbscan")?;

    let clusters = enforce_min_size(labels.iter().copied(), params.min_cluster_size);
    let found = clusters
        .iter()
        .filter(|c| !c.is_noise())
        .max()
        .map_or(0, |c| c.0 + 1);
    let noise = clusters.iter().filter(|c| c.is_noise()).count();
    info!(rows, clusters = found, noise, "clustered review embeddings");
    Ok(clusters)
}

/// Demote undersized groups to noise and renumber the rest by first appearance.
fn enforce_min_size<I>(labels: I, min_cluster_size: usize) -> Vec<ClusterId>
where
    I: Iterator<Item = Option<usize>> + Clone,
{
    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for label in labels.clone().flatten() {
        *sizes.entry(label).or_insert(0) += 1;
    }
    let mut renumbered: HashMap<usize, i64> = HashMap::new();
    labels
        .map(|label| match label {
            Some(raw) if sizes.get(&raw).copied().unwrap_or(0) >= min_cluster_size => {
                let next = renumbered.len() as i64;
                ClusterId(*renumbered.entry(raw).or_insert(next))
            }
            _ => ClusterId::NOISE,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undersized_groups_become_noise() {
        let labels = vec![Some(3), Some(3), Some(7), None, Some(3), Some(7), Some(9)];
        let clusters = enforce_min_size(labels.into_iter(), 2);
        assert_eq!(
            clusters,
            vec![
                ClusterId(0),
                ClusterId(0),
                ClusterId(1),
                ClusterId::NOISE,
                ClusterId(0),
                ClusterId(1),
                ClusterId::NOISE,
            ]
        );
    }
}
