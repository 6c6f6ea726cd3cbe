//! Review tagging pipeline: embedding, clustering, topics, sentiment, keywords.

pub mod cluster;
pub mod embeddings;
pub mod keywords;
pub mod synonyms;
pub mod topics;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::reviews::LoadedReviews,
    insights::{self, narrative, sentiment::Sentiment, AnalysisReport},
};

use self::{
    cluster::{ClusterId, ClusterParams},
    embeddings::Embedder,
    keywords::KeywordParams,
    synonyms::Thesaurus,
    topics::{Topic, TopicVocabulary},
};

/// A review with every derived label attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedReview {
    pub row: usize,
    pub text: String,
    pub rating: f64,
    pub brand: Option<String>,
    pub date: Option<NaiveDate>,
    pub cluster: ClusterId,
    pub topics: Vec<Topic>,
    pub sentiment: Sentiment,
}

/// Tunables for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    pub cluster: ClusterParams,
    pub keywords: KeywordParams,
}

impl PipelineParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            cluster: ClusterParams {
                min_cluster_size: settings.min_cluster_size,
                min_samples: settings.min_samples,
                tolerance: settings.cluster_tolerance,
            },
            keywords: KeywordParams {
                min_cluster_size: settings.keyword_min_cluster_size,
                top_n: settings.top_keywords,
                max_features: settings.max_features,
            },
        }
    }
}

/// Stateless batch transform from loaded reviews to an [`AnalysisReport`].
pub struct Pipeline {
    embedder: Box<dyn Embedder>,
    vocabulary: TopicVocabulary,
    params: PipelineParams,
}

impl Pipeline {
    pub fn new(embedder: Box<dyn Embedder>, vocabulary: TopicVocabulary, params: PipelineParams) -> Self {
        Self {
            embedder,
            vocabulary,
            params,
        }
    }

    /// Wire up the embedder and expanded vocabulary described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = embeddings::select_embedder(settings)?;
        let vocabulary = load_vocabulary(settings)?;
        Ok(Self::new(
            embedder,
            vocabulary,
            PipelineParams::from_settings(settings),
        ))
    }

    pub fn vocabulary(&self) -> &TopicVocabulary {
        &self.vocabulary
    }

    /// Run every stage over `loaded` and aggregate the results.
    #[instrument(skip_all, fields(rows = loaded.reviews.len()))]
    pub fn run(&self, loaded: LoadedReviews) -> Result<AnalysisReport> {
        let texts: Vec<String> = loaded.reviews.iter().map(|r| r.text.clone()).collect();

        let vectors = embeddings::embed_reviews(self.embedder.as_ref(), &texts)
            .context("embedding reviews")?;
        let clusters =
            cluster::cluster_embeddings(&vectors, &self.params.cluster).context("clustering reviews")?;
        let cluster_keywords = keywords::cluster_keywords(&texts, &clusters, &self.params.keywords);

        let reviews: Vec<TaggedReview> = loaded
            .reviews
            .into_iter()
            .zip(clusters)
            .map(|(review, cluster)| TaggedReview {
                topics: self.vocabulary.assign_topics(&review.text),
                sentiment: Sentiment::from_rating(review.rating),
                cluster,
                row: review.row,
                text: review.text,
                rating: review.rating,
                brand: review.brand,
                date: review.date,
            })
            .collect();

        let kpis = insights::kpis(&reviews, loaded.skipped, loaded.filtered_out);
        let topic_volume = insights::topic_volume(&reviews);
        let sentiment_by_topic = insights::sentiment_by_topic(&reviews);
        let monthly_trend = insights::monthly_trend(&reviews);
        let findings = narrative::derive(&kpis, &topic_volume, &sentiment_by_topic, &monthly_trend);
        info!(
            reviews = reviews.len(),
            clusters = kpis.clusters,
            insights = findings.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            generated_at: Utc::now(),
            embedder: self.embedder.name().to_string(),
            cluster_sizes: insights::cluster_sizes(&reviews),
            brands: insights::brand_breakdown(&reviews),
            kpis,
            topic_volume,
            sentiment_by_topic,
            cluster_keywords,
            monthly_trend,
            insights: findings,
            reviews,
        })
    }
}

/// Expanded topic vocabulary, including any synonyms file from the settings.
pub fn load_vocabulary(settings: &Settings) -> Result<TopicVocabulary> {
    let thesaurus = match &settings.synonyms_path {
        Some(path) => Thesaurus::with_extra_file(path)?,
        None => Thesaurus::builtin(),
    };
    Ok(TopicVocabulary::expanded(&thesaurus))
}
