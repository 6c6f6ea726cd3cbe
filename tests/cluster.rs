use review_insights::nlp::cluster::{cluster_embeddings, ClusterId, ClusterParams};

fn params() -> ClusterParams {
    ClusterParams {
        min_cluster_size: 5,
        min_samples: 3,
        tolerance: 0.1,
    }
}

fn group(center: [f32; 3], axis: usize, n: usize) -> Vec<Vec<f32>> {
    (0..n)
        .map(|i| {
            let mut point = center.to_vec();
            point[axis] += 0.005 * i as f32;
            point
        })
        .collect()
}

#[test]
fn dense_groups_become_clusters_and_stragglers_noise() {
    let mut embeddings = group([1.0, 0.0, 0.0], 1, 12);
    embeddings.extend(group([0.0, 1.0, 0.0], 2, 12));
    // Dense but smaller than the minimum cluster size.
    embeddings.extend(group([0.0, 0.0, 1.0], 0, 4));
    embeddings.push(vec![-1.0, 0.0, 0.0]);

    let clusters = cluster_embeddings(&embeddings, &params()).unwrap();
    assert_eq!(clusters.len(), embeddings.len());
    assert!(clusters[..12].iter().all(|c| *c == ClusterId(0)));
    assert!(clusters[12..24].iter().all(|c| *c == ClusterId(1)));
    assert!(clusters[24..].iter().all(ClusterId::is_noise));
}

#[test]
fn too_few_rows_are_all_noise() {
    let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
    let clusters = cluster_embeddings(&embeddings, &params()).unwrap();
    assert_eq!(clusters, vec![ClusterId::NOISE; 2]);
    assert!(cluster_embeddings(&[], &params()).unwrap().is_empty());
}

#[test]
fn ragged_embeddings_are_rejected() {
    let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
    assert!(cluster_embeddings(&embeddings, &params()).is_err());

    // Too few rows to cluster is no excuse for mismatched vectors.
    let few = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
    let err = cluster_embeddings(&few, &ClusterParams {
        min_samples: 10,
        ..params()
    })
    .unwrap_err();
    assert!(err.to_string().contains("inconsistent dimensions"));
}

#[test]
fn min_samples_below_two_is_raised() {
    let embeddings = vec![vec![1.0, 0.0]; 3];
    let lenient = ClusterParams {
        min_cluster_size: 1,
        min_samples: 1,
        tolerance: 0.1,
    };
    let clusters = cluster_embeddings(&embeddings, &lenient).unwrap();
    assert_eq!(clusters, vec![ClusterId(0); 3]);

    let zero = ClusterParams {
        min_samples: 0,
        ..lenient
    };
    assert_eq!(cluster_embeddings(&embeddings[..1], &zero).unwrap(), vec![ClusterId::NOISE]);
}

#[test]
fn noise_label_serialises_as_minus_one() {
    assert_eq!(serde_json::to_string(&ClusterId::NOISE).unwrap(), "-1");
    assert_eq!(ClusterId(3).to_string(), "3");
}
