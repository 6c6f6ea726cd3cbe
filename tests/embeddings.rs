use review_insights::{
    config::{EmbedderKind, Settings},
    nlp::embeddings::{embed_reviews, l2_normalize_in_place, select_embedder, Embedder, HashingEmbedder},
};

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[test]
fn hashing_embeddings_are_deterministic_unit_vectors() {
    let embedder = HashingEmbedder::new(64);
    let texts = vec![
        "creamy and delicious yogurt".to_string(),
        "creamy and delicious yogurt".to_string(),
        "".to_string(),
    ];
    let vectors = embed_reviews(&embedder, &texts).unwrap();
    assert_eq!(vectors.len(), 3);
    assert!(vectors.iter().all(|v| v.len() == 64));
    assert_eq!(vectors[0], vectors[1]);
    assert!((norm(&vectors[0]) - 1.0).abs() < 1e-5);
    assert!(vectors[2].iter().all(|x| *x == 0.0));
}

#[test]
fn shared_vocabulary_means_closer_vectors() {
    let embedder = HashingEmbedder::new(256);
    let vectors = embedder
        .embed(&[
            "the bottle cap arrived broken".to_string(),
            "bottle cap arrived broken again".to_string(),
            "wonderful mango flavour".to_string(),
        ])
        .unwrap();
    let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    assert!(dot(&vectors[0], &vectors[1]) > dot(&vectors[0], &vectors[2]));
}

#[test]
fn zero_vectors_stay_zero() {
    let mut v = vec![0.0f32; 4];
    l2_normalize_in_place(&mut v);
    assert_eq!(v, vec![0.0; 4]);
    let mut w = vec![3.0f32, 4.0];
    l2_normalize_in_place(&mut w);
    assert_eq!(w, vec![0.6, 0.8]);
}

#[test]
fn hashing_backend_is_selectable() {
    let settings = Settings {
        embedder: EmbedderKind::Hashing,
        embedding_dim: 32,
        ..Settings::default()
    };
    let embedder = select_embedder(&settings).unwrap();
    assert_eq!(embedder.name(), "hashing");
    assert_eq!(embedder.dimension(), 32);
}

#[cfg(not(feature = "embeddings"))]
#[test]
fn fastembed_request_falls_back_without_the_feature() {
    let settings = Settings {
        embedder: EmbedderKind::Fastembed,
        ..Settings::default()
    };
    let embedder = select_embedder(&settings).unwrap();
    assert_eq!(embedder.name(), "hashing");
}
