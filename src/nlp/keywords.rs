//! Term counting and per-cluster keyword extraction.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::nlp::cluster::ClusterId;

/// NLTK's English stopword list.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Pronouns, prepositions and auxiliaries that otherwise dominate review counts.
const EXTRA_STOPWORDS: &[&str] = &[
    "he", "she", "it", "they", "we", "i", "you", "me", "my", "mine", "us", "our", "ours", "in",
    "on", "at", "by", "with", "for", "to", "from", "of", "as", "has", "have", "do", "does", "did",
    "is", "are", "was", "were", "be",
];

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ENGLISH_STOPWORDS
        .iter()
        .chain(EXTRA_STOPWORDS)
        .copied()
        .collect()
});

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// Lowercase word tokens of two or more characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Keyword extraction knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordParams {
    /// Clusters with fewer members are skipped.
    pub min_cluster_size: usize,
    pub top_n: usize,
    /// Vocabulary cap, keeping the most frequent terms corpus-wide.
    pub max_features: usize,
}

impl Default for KeywordParams {
    fn default() -> Self {
        Self {
            min_cluster_size: 5,
            top_n: 15,
            max_features: 2000,
        }
    }
}

/// A term and how often it occurs within a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub frequency: usize,
}

/// Bag-of-ngrams counter with stopword removal and a capped vocabulary.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    max_features: usize,
    ngram_range: (usize, usize),
}

impl CountVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            ngram_range: (1, 2),
        }
    }

    /// Terms of one document; stopwords are dropped before n-grams are joined.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|t| !is_stopword(t))
            .collect();
        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 0 || tokens.len() < n {
                continue;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Count terms per document, restricted to the fitted vocabulary.
    pub fn fit_transform(&self, texts: &[String]) -> DocumentTerms {
        let analysed: Vec<Vec<String>> = texts.iter().map(|t| self.analyze(t)).collect();

        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        for terms in &analysed {
            for term in terms {
                *corpus_counts.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);
        let vocabulary: HashSet<String> = ranked.iter().map(|(t, _)| t.to_string()).collect();

        let documents = analysed
            .into_iter()
            .map(|terms| {
                let mut counts: HashMap<String, usize> = HashMap::new();
                for term in terms {
                    if vocabulary.contains(&term) {
                        *counts.entry(term).or_insert(0) += 1;
                    }
                }
                counts
            })
            .collect();
        debug!(vocabulary = vocabulary.len(), "fitted count vectorizer");
        DocumentTerms {
            vocabulary_size: vocabulary.len(),
            documents,
        }
    }
}

/// Sparse document-term counts.
#[derive(Debug, Clone)]
pub struct DocumentTerms {
    pub vocabulary_size: usize,
    pub documents: Vec<HashMap<String, usize>>,
}

impl DocumentTerms {
    /// Summed counts over `rows`, highest first, ties alphabetical.
    pub fn top_terms(&self, rows: &[usize], top_n: usize) -> Vec<KeywordCount> {
        let mut sums: HashMap<&str, usize> = HashMap::new();
        for &row in rows {
            if let Some(doc) = self.documents.get(row) {
                for (term, count) in doc {
                    *sums.entry(term.as_str()).or_insert(0) += count;
                }
            }
        }
        let mut ranked: Vec<KeywordCount> = sums
            .into_iter()
            .filter(|(_, c)| *c > 0)
            .map(|(keyword, frequency)| KeywordCount {
                keyword: keyword.to_string(),
                frequency,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        ranked.truncate(top_n);
        ranked
    }
}

/// Top keywords for every cluster (noise included) of at least the minimum size.
pub fn cluster_keywords(
    texts: &[String],
    clusters: &[ClusterId],
    params: &KeywordParams,
) -> BTreeMap<ClusterId, Vec<KeywordCount>> {
    let terms = CountVectorizer::new(params.max_features).fit_transform(texts);

    let mut members: BTreeMap<ClusterId, Vec<usize>> = BTreeMap::new();
    for (row, cluster) in clusters.iter().enumerate() {
        members.entry(*cluster).or_default().push(row);
    }

    let keywords: BTreeMap<ClusterId, Vec<KeywordCount>> = members
        .into_iter()
        .filter(|(_, rows)| rows.len() >= params.min_cluster_size)
        .map(|(cluster, rows)| (cluster, terms.top_terms(&rows, params.top_n)))
        .collect();
    info!(clusters = keywords.len(), "extracted cluster keywords");
    keywords
}
