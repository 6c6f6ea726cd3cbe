//! Rule-based narrative findings derived from the aggregates.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    sentiment::{Sentiment, SentimentCounts},
    Kpis,
};
use crate::nlp::topics::Topic;

/// Topics need this many mentions before their sentiment split is trusted.
const MIN_SUPPORT: usize = 5;
const FRICTION_MARGIN: f64 = 0.10;
const SATISFIED_SHARE: f64 = 0.60;
const STANDOUT_SHARE: f64 = 0.80;
const TREND_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Headline,
    TopTopic,
    PainPoint,
    Friction,
    Standout,
    Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: String) -> Self {
        Self { kind, message }
    }
}

/// Derive findings in a stable order: headline, volume, pain points, trend.
pub fn derive(
    kpis: &Kpis,
    topic_volume: &IndexMap<Topic, usize>,
    sentiment_by_topic: &IndexMap<Topic, SentimentCounts>,
    monthly_trend: &BTreeMap<String, SentimentCounts>,
) -> Vec<Insight> {
    let mut out = Vec::new();
    if kpis.total_reviews == 0 {
        return out;
    }

    let overall_positive = kpis.sentiment.share(Sentiment::Positive);
    let overall_negative = kpis.sentiment.share(Sentiment::Negative);
    out.push(Insight::new(
        InsightKind::Headline,
        format!(
            "Average rating is {:.2}/5 across {} reviews: {} positive, {} negative.",
            kpis.mean_rating,
            kpis.total_reviews,
            pct(overall_positive),
            pct(overall_negative)
        ),
    ));

    let top = Topic::KEYED
        .into_iter()
        .filter_map(|t| topic_volume.get(&t).map(|n| (t, *n)))
        .filter(|(_, n)| *n > 0)
        .fold(None::<(Topic, usize)>, |best, cur| match best {
            Some(b) if b.1 >= cur.1 => Some(b),
            _ => Some(cur),
        });
    if let Some((topic, count)) = top {
        out.push(Insight::new(
            InsightKind::TopTopic,
            format!(
                "{} is the most discussed theme: {} reviews ({} of the total).",
                capitalise(topic.as_str()),
                count,
                pct(count as f64 / kpis.total_reviews as f64)
            ),
        ));
    }

    let supported: Vec<(Topic, SentimentCounts)> = sentiment_by_topic
        .iter()
        .filter(|(_, c)| c.total() >= MIN_SUPPORT)
        .map(|(t, c)| (*t, *c))
        .collect();

    let worst = supported
        .iter()
        .filter(|(_, c)| c.negative > 0)
        .fold(None::<&(Topic, SentimentCounts)>, |best, cur| match best {
            Some(b) if b.1.share(Sentiment::Negative) >= cur.1.share(Sentiment::Negative) => Some(b),
            _ => Some(cur),
        });
    if let Some((topic, counts)) = worst {
        out.push(Insight::new(
            InsightKind::PainPoint,
            format!(
                "{} draws the highest share of negative reviews ({} of {} mentions).",
                capitalise(topic.as_str()),
                pct(counts.share(Sentiment::Negative)),
                counts.total()
            ),
        ));
    }

    // Well-rated overall, yet one theme collects the complaints.
    if overall_positive >= SATISFIED_SHARE {
        for (topic, counts) in &supported {
            let negative = counts.share(Sentiment::Negative);
            if negative - overall_negative >= FRICTION_MARGIN {
                out.push(Insight::new(
                    InsightKind::Friction,
                    format!(
                        "Customers rate the products highly overall but complain about {}: {} negative versus {} across all reviews.",
                        topic.as_str(),
                        pct(negative),
                        pct(overall_negative)
                    ),
                ));
            }
        }
    }

    for (topic, counts) in &supported {
        let positive = counts.share(Sentiment::Positive);
        if positive >= STANDOUT_SHARE {
            out.push(Insight::new(
                InsightKind::Standout,
                format!(
                    "Reviews mentioning {} are overwhelmingly positive ({} of {}).",
                    topic.as_str(),
                    pct(positive),
                    counts.total()
                ),
            ));
        }
    }

    if let (Some((first_month, first)), Some((last_month, last))) =
        (monthly_trend.iter().next(), monthly_trend.iter().next_back())
    {
        if first_month != last_month {
            let before = first.share(Sentiment::Positive);
            let after = last.share(Sentiment::Positive);
            let movement = if after - before >= TREND_MARGIN {
                "rose"
            } else if before - after >= TREND_MARGIN {
                "fell"
            } else {
                "held steady"
            };
            out.push(Insight::new(
                InsightKind::Trend,
                format!(
                    "Positive share {movement} from {} in {first_month} to {} in {last_month}.",
                    pct(before),
                    pct(after)
                ),
            ));
        }
    }

    out
}

fn pct(share: f64) -> String {
    format!("{:.0}%", share * 100.0)
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
