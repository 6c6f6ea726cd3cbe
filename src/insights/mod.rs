//! Aggregate summaries over tagged reviews.

pub mod narrative;
pub mod render;
pub mod sentiment;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::nlp::{cluster::ClusterId, keywords::KeywordCount, topics::Topic, TaggedReview};

use self::{
    narrative::Insight,
    sentiment::{Sentiment, SentimentCounts},
};

/// Headline numbers for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_reviews: usize,
    pub skipped_rows: usize,
    pub filtered_out: usize,
    pub mean_rating: f64,
    /// Reviews per rounded star, 1 through 5.
    pub rating_histogram: BTreeMap<u8, usize>,
    pub sentiment: SentimentCounts,
    pub clusters: usize,
    pub noise_reviews: usize,
    /// Share of reviews that matched no keyed topic.
    pub other_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSummary {
    pub brand: String,
    pub reviews: usize,
    pub mean_rating: f64,
    pub positive_share: f64,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub embedder: String,
    pub kpis: Kpis,
    pub topic_volume: IndexMap<Topic, usize>,
    pub sentiment_by_topic: IndexMap<Topic, SentimentCounts>,
    pub cluster_sizes: BTreeMap<ClusterId, usize>,
    pub cluster_keywords: BTreeMap<ClusterId, Vec<KeywordCount>>,
    /// `YYYY-MM` buckets; empty when the export has no dates.
    pub monthly_trend: BTreeMap<String, SentimentCounts>,
    pub brands: Vec<BrandSummary>,
    pub insights: Vec<Insight>,
    pub reviews: Vec<TaggedReview>,
}

/// Reviews per topic label, counting every label of multi-topic reviews.
pub fn topic_volume(reviews: &[TaggedReview]) -> IndexMap<Topic, usize> {
    let mut volume: IndexMap<Topic, usize> = Topic::ALL.into_iter().map(|t| (t, 0)).collect();
    for topic in reviews.iter().flat_map(|r| &r.topics) {
        *volume.entry(*topic).or_insert(0) += 1;
    }
    volume
}

/// Sentiment split for each keyed topic.
pub fn sentiment_by_topic(reviews: &[TaggedReview]) -> IndexMap<Topic, SentimentCounts> {
    Topic::KEYED
        .into_iter()
        .map(|topic| {
            let counts = reviews
                .iter()
                .filter(|r| r.topics.contains(&topic))
                .map(|r| r.sentiment)
                .collect();
            (topic, counts)
        })
        .collect()
}

pub fn cluster_sizes(reviews: &[TaggedReview]) -> BTreeMap<ClusterId, usize> {
    let mut sizes = BTreeMap::new();
    for review in reviews {
        *sizes.entry(review.cluster).or_insert(0) += 1;
    }
    sizes
}

pub fn kpis(reviews: &[TaggedReview], skipped_rows: usize, filtered_out: usize) -> Kpis {
    let total = reviews.len();
    let mean_rating = mean(reviews.iter().map(|r| r.rating));
    let mut rating_histogram: BTreeMap<u8, usize> = (1..=5).map(|star| (star, 0)).collect();
    for review in reviews {
        let star = review.rating.round().clamp(1.0, 5.0) as u8;
        *rating_histogram.entry(star).or_insert(0) += 1;
    }
    let clusters = reviews
        .iter()
        .filter(|r| !r.cluster.is_noise())
        .map(|r| r.cluster)
        .collect::<std::collections::HashSet<_>>()
        .len();
    let other = reviews
        .iter()
        .filter(|r| r.topics == [Topic::Other])
        .count();
    Kpis {
        total_reviews: total,
        skipped_rows,
        filtered_out,
        mean_rating,
        rating_histogram,
        sentiment: reviews.iter().map(|r| r.sentiment).collect(),
        clusters,
        noise_reviews: reviews.iter().filter(|r| r.cluster.is_noise()).count(),
        other_share: ratio(other, total),
    }
}

/// Sentiment per calendar month for dated reviews.
pub fn monthly_trend(reviews: &[TaggedReview]) -> BTreeMap<String, SentimentCounts> {
    let mut trend: BTreeMap<String, SentimentCounts> = BTreeMap::new();
    for review in reviews {
        if let Some(date) = review.date {
            trend
                .entry(date.format("%Y-%m").to_string())
                .or_default()
                .add(review.sentiment);
        }
    }
    trend
}

/// Per-brand volume and satisfaction, largest brand first.
pub fn brand_breakdown(reviews: &[TaggedReview]) -> Vec<BrandSummary> {
    let mut grouped: HashMap<&str, Vec<&TaggedReview>> = HashMap::new();
    for review in reviews {
        if let Some(brand) = review.brand.as_deref() {
            grouped.entry(brand).or_default().push(review);
        }
    }
    let mut brands: Vec<BrandSummary> = grouped
        .into_iter()
        .map(|(brand, rows)| {
            let sentiment: SentimentCounts = rows.iter().map(|r| r.sentiment).collect();
            BrandSummary {
                brand: brand.to_string(),
                reviews: rows.len(),
                mean_rating: mean(rows.iter().map(|r| r.rating)),
                positive_share: sentiment.share(Sentiment::Positive),
            }
        })
        .collect();
    brands.sort_by(|a, b| b.reviews.cmp(&a.reviews).then_with(|| a.brand.cmp(&b.brand)));
    brands
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
