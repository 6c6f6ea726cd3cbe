//! Static HTML pages rendered with askama.

use anyhow::Result;
use askama::Template;

use crate::insights::{sentiment::Sentiment, AnalysisReport};

pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
}

pub struct BarRow {
    pub label: String,
    pub count: usize,
    /// Bar width in percent of the largest row.
    pub width: u32,
}

pub struct SentimentRow {
    pub topic: &'static str,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub positive_width: u32,
    pub neutral_width: u32,
    pub negative_width: u32,
}

pub struct ClusterRow {
    pub cluster: String,
    pub size: usize,
    pub keywords: Vec<BarRow>,
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportPage {
    pub generated_at: String,
    pub embedder: String,
    pub kpis: Vec<KpiCard>,
    pub topics: Vec<BarRow>,
    pub sentiment: Vec<SentimentRow>,
    pub clusters: Vec<ClusterRow>,
    pub insights: Vec<String>,
}

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadPage {
    pub message: String,
}

/// Render the full report page.
pub fn render_report(report: &AnalysisReport) -> Result<String> {
    Ok(ReportPage::from(report).render()?)
}

/// Render the "nothing analysed yet" page.
pub fn render_upload_prompt(message: &str) -> Result<String> {
    Ok(UploadPage {
        message: message.to_string(),
    }
    .render()?)
}

impl From<&AnalysisReport> for ReportPage {
    fn from(report: &AnalysisReport) -> Self {
        let kpis = &report.kpis;
        let cards = vec![
            KpiCard {
                label: "Reviews",
                value: kpis.total_reviews.to_string(),
            },
            KpiCard {
                label: "Average rating",
                value: format!("{:.2}", kpis.mean_rating),
            },
            KpiCard {
                label: "Positive",
                value: format!("{:.0}%", kpis.sentiment.share(Sentiment::Positive) * 100.0),
            },
            KpiCard {
                label: "Negative",
                value: format!("{:.0}%", kpis.sentiment.share(Sentiment::Negative) * 100.0),
            },
            KpiCard {
                label: "Clusters",
                value: kpis.clusters.to_string(),
            },
        ];

        let topics = bars(
            report
                .topic_volume
                .iter()
                .map(|(t, n)| (t.as_str().to_string(), *n)),
        );

        let sentiment = report
            .sentiment_by_topic
            .iter()
            .map(|(topic, counts)| {
                let total = counts.total().max(1) as f64;
                let width = |n: usize| ((n as f64 / total) * 100.0).round() as u32;
                SentimentRow {
                    topic: topic.as_str(),
                    positive: counts.positive,
                    neutral: counts.neutral,
                    negative: counts.negative,
                    positive_width: width(counts.positive),
                    neutral_width: width(counts.neutral),
                    negative_width: width(counts.negative),
                }
            })
            .collect();

        let clusters = report
            .cluster_keywords
            .iter()
            .map(|(cluster, keywords)| ClusterRow {
                cluster: if cluster.is_noise() {
                    "noise".to_string()
                } else {
                    cluster.to_string()
                },
                size: report.cluster_sizes.get(cluster).copied().unwrap_or(0),
                keywords: bars(keywords.iter().map(|k| (k.keyword.clone(), k.frequency))),
            })
            .collect();

        Self {
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            embedder: report.embedder.clone(),
            kpis: cards,
            topics,
            sentiment,
            clusters,
            insights: report.insights.iter().map(|i| i.message.clone()).collect(),
        }
    }
}

fn bars(rows: impl Iterator<Item = (String, usize)>) -> Vec<BarRow> {
    let rows: Vec<(String, usize)> = rows.collect();
    let max = rows.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1) as f64;
    rows.into_iter()
        .map(|(label, count)| BarRow {
            width: ((count as f64 / max) * 100.0).round() as u32,
            label,
            count,
        })
        .collect()
}
