//! Plain-text console rendering of an analysis.

use std::fmt::Write;

use super::{sentiment::Sentiment, AnalysisReport};

pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let kpis = &report.kpis;
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "Reviews analysed: {} (skipped {}, filtered {})",
        kpis.total_reviews, kpis.skipped_rows, kpis.filtered_out
    );
    let _ = writeln!(
        out,
        "Average rating: {:.2} | positive {:.0}% | neutral {:.0}% | negative {:.0}%",
        kpis.mean_rating,
        kpis.sentiment.share(Sentiment::Positive) * 100.0,
        kpis.sentiment.share(Sentiment::Neutral) * 100.0,
        kpis.sentiment.share(Sentiment::Negative) * 100.0,
    );

    let _ = writeln!(out, "\nTopic volume");
    for (topic, count) in &report.topic_volume {
        let _ = writeln!(out, "  {:<12}{:>6}", topic.as_str(), count);
    }

    let _ = writeln!(out, "\nSentiment per topic");
    let _ = writeln!(
        out,
        "  {:<12}{:>9}{:>9}{:>9}",
        "topic", "positive", "neutral", "negative"
    );
    for (topic, counts) in &report.sentiment_by_topic {
        let _ = writeln!(
            out,
            "  {:<12}{:>9}{:>9}{:>9}",
            topic.as_str(),
            counts.positive,
            counts.neutral,
            counts.negative
        );
    }

    let _ = writeln!(out, "\nCluster keywords");
    if report.cluster_keywords.is_empty() {
        let _ = writeln!(out, "  (no cluster large enough)");
    }
    for (cluster, keywords) in &report.cluster_keywords {
        let size = report.cluster_sizes.get(cluster).copied().unwrap_or(0);
        let terms = keywords
            .iter()
            .map(|k| format!("{} ({})", k.keyword, k.frequency))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  cluster {cluster} ({size} reviews): {terms}");
    }

    if !report.insights.is_empty() {
        let _ = writeln!(out, "\nInsights");
        for insight in &report.insights {
            let _ = writeln!(out, "  - {}", insight.message);
        }
    }
    out
}
