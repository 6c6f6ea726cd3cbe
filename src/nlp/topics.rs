//! Keyword-driven multi-topic tagging.

use std::{fmt, str::FromStr};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nlp::synonyms::SynonymSource;

/// Closed set of review themes plus the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Flavour,
    Texture,
    Packaging,
    Health,
    Price,
    Quality,
    Other,
}

impl Topic {
    /// Topics that carry keywords, in assignment order.
    pub const KEYED: [Topic; 6] = [
        Self::Flavour,
        Self::Texture,
        Self::Packaging,
        Self::Health,
        Self::Price,
        Self::Quality,
    ];

    pub const ALL: [Topic; 7] = [
        Self::Flavour,
        Self::Texture,
        Self::Packaging,
        Self::Health,
        Self::Price,
        Self::Quality,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flavour => "flavour",
            Self::Texture => "texture",
            Self::Packaging => "packaging",
            Self::Health => "health",
            Self::Price => "price",
            Self::Quality => "quality",
            Self::Other => "other",
        }
    }

    /// Hand-picked seed keywords before synonym expansion.
    pub fn seeds(&self) -> &'static [&'static str] {
        match self {
            Self::Flavour => &["flavour", "taste", "sweet", "bitter", "aroma", "delicious"],
            Self::Texture => &["creamy", "thick", "liquid", "grainy", "texture", "smooth"],
            Self::Packaging => &["package", "bottle", "box", "cap", "broken", "expiry", "label"],
            Self::Health => &["diabetes", "cholesterol", "healthy", "sugar-free", "benefit", "0%"],
            Self::Price => &["expensive", "price", "cheap", "cost", "value"],
            Self::Quality => &["good", "bad", "fresh", "smell", "defective", "stale"],
            Self::Other => &[],
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("unknown topic `{s}`"))
    }
}

/// Seeds plus their synonyms, lowercased, `_` turned into spaces, first
/// occurrence order kept.
pub fn expand_keywords(seeds: &[&str], source: &dyn SynonymSource) -> Vec<String> {
    let mut expanded: IndexSet<String> = seeds.iter().map(|s| s.to_lowercase()).collect();
    for seed in seeds {
        for lemma in source.synonyms(seed) {
            let lemma = lemma.replace('_', " ").trim().to_lowercase();
            if !lemma.is_empty() {
                expanded.insert(lemma);
            }
        }
    }
    expanded.into_iter().collect()
}

/// Expanded keyword lists for every keyed topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicVocabulary {
    keywords: IndexMap<Topic, Vec<String>>,
}

impl TopicVocabulary {
    /// Build the vocabulary from the seed lists, widened by `source`.
    pub fn expanded(source: &dyn SynonymSource) -> Self {
        let keywords: IndexMap<Topic, Vec<String>> = Topic::KEYED
            .into_iter()
            .map(|topic| (topic, expand_keywords(topic.seeds(), source)))
            .collect();
        for (topic, words) in &keywords {
            debug!(%topic, keywords = words.len(), "expanded topic keywords");
        }
        Self { keywords }
    }

    pub fn keywords(&self, topic: Topic) -> &[String] {
        self.keywords.get(&topic).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Topic, &Vec<String>)> {
        self.keywords.iter()
    }

    /// Every topic whose keywords occur in `text`; `[Other]` when none do.
    ///
    /// Matching is plain substring containment on the lowercased text, so
    /// `box` also fires on `boxes`.
    pub fn assign_topics(&self, text: &str) -> Vec<Topic> {
        let lower = text.to_lowercase();
        let assigned: Vec<Topic> = self
            .keywords
            .iter()
            .filter(|(_, words)| words.iter().any(|w| lower.contains(w.as_str())))
            .map(|(topic, _)| *topic)
            .collect();
        if assigned.is_empty() {
            vec![Topic::Other]
        } else {
            assigned
        }
    }
}
