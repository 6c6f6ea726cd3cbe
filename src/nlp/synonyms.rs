//! Lexical synonym lookup used to widen topic keyword sets.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use tracing::info;

/// Source of synonyms for a single keyword.
pub trait SynonymSource: Send + Sync {
    /// Lemmas related to `word`; may contain `_` as a word separator.
    fn synonyms(&self, word: &str) -> Vec<String>;
}

/// Lemma groups for the seed keywords, trimmed to the senses that occur in
/// food and grocery reviews.
static BUILTIN: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let entries: &[(&str, &[&str])] = &[
        // flavour
        ("flavour", &["flavor", "flavour", "relish", "sapidity", "savor", "savour", "smack", "tang", "flavoring", "flavouring", "seasoning"]),
        ("taste", &["taste", "gustation", "sense_of_taste", "gustatory_modality", "savor", "savour", "mouthful", "tasting", "aftertaste"]),
        ("sweet", &["sweet", "sweetness", "sugariness", "sugary", "cloying", "saccharine", "syrupy", "dessert", "confection"]),
        ("bitter", &["bitter", "bitterness", "acerbic", "acerb", "acrid", "sour", "tart"]),
        ("aroma", &["aroma", "fragrance", "scent", "perfume", "odor", "odour", "redolence", "bouquet"]),
        ("delicious", &["delicious", "delectable", "luscious", "pleasant-tasting", "scrumptious", "toothsome", "yummy", "tasty"]),
        // texture
        ("creamy", &["creamy", "creaminess", "velvety"]),
        ("thick", &["thick", "thickly", "dense", "viscous", "thickened", "heavy"]),
        ("liquid", &["liquid", "liquidness", "fluid", "watery", "runny", "thin"]),
        ("grainy", &["grainy", "granular", "granulose", "gritty", "mealy", "coarse-grained", "lumpy"]),
        ("texture", &["texture", "consistency", "mouthfeel", "grain"]),
        ("smooth", &["smooth", "smoothness", "silky", "silken", "sleek"]),
        // packaging
        ("package", &["package", "packet", "parcel", "bundle", "packaging", "pack"]),
        ("bottle", &["bottle", "bottleful", "carafe", "flask"]),
        ("box", &["box", "boxful", "carton", "crate", "case"]),
        ("cap", &["cap", "lid", "closure", "seal", "crownwork"]),
        ("broken", &["broken", "broke", "cracked", "crushed", "damaged", "busted", "smashed", "leaking", "leaked"]),
        ("expiry", &["expiry", "expiration", "expiration_date", "best_before", "use_by", "sell-by"]),
        ("label", &["label", "labelling", "labeling", "sticker", "tag"]),
        // health
        ("diabetes", &["diabetes", "diabetic", "blood_sugar"]),
        ("cholesterol", &["cholesterol", "cholesterin"]),
        ("healthy", &["healthy", "healthful", "wholesome", "nutritious", "salubrious", "good_for_you"]),
        ("sugar-free", &["sugar-free", "sugarless", "unsweetened", "no_added_sugar"]),
        ("benefit", &["benefit", "welfare", "advantage", "do_good"]),
        ("0%", &["0%", "zero_percent", "fat-free", "fat_free", "nonfat"]),
        // price
        ("expensive", &["expensive", "costly", "pricey", "pricy", "overpriced", "high-priced", "dear"]),
        ("price", &["price", "pricing", "monetary_value", "toll"]),
        ("cheap", &["cheap", "inexpensive", "affordable", "bargain", "low-cost", "budget"]),
        ("cost", &["cost", "costing", "outlay", "expense", "expenditure"]),
        ("value", &["value", "economic_value", "worth", "value_for_money"]),
        // quality
        ("good", &["good", "goodness", "estimable", "beneficial", "satisfactory", "excellent", "decent"]),
        ("bad", &["bad", "badness", "poor", "spoiled", "spoilt", "awful", "terrible", "unsound"]),
        ("fresh", &["fresh", "freshness", "freshly", "crisp", "unspoiled", "unspoilt"]),
        ("smell", &["smell", "odor", "odour", "stink", "reek", "whiff", "olfaction", "sense_of_smell"]),
        ("defective", &["defective", "faulty", "malfunctioning", "deficient", "inoperative"]),
        ("stale", &["stale", "rancid", "musty", "moldy", "mouldy", "flat"]),
    ];
    entries.iter().copied().collect()
});

/// Built-in lemma table plus optional user-supplied entries.
#[derive(Debug, Clone, Default)]
pub struct Thesaurus {
    extra: HashMap<String, Vec<String>>,
}

impl Thesaurus {
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Merge a JSON object of `word -> [synonym, ...]` on top of the built-ins.
    pub fn with_extra_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading synonyms file {}", path.display()))?;
        let extra: HashMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing synonyms file {}", path.display()))?;
        let extra = extra
            .into_iter()
            .map(|(word, syns)| (word.trim().to_lowercase(), syns))
            .collect::<HashMap<_, _>>();
        info!(path = %path.display(), entries = extra.len(), "loaded extra synonyms");
        Ok(Self { extra })
    }
}

impl SynonymSource for Thesaurus {
    fn synonyms(&self, word: &str) -> Vec<String> {
        let key = word.trim().to_lowercase();
        let mut out: Vec<String> = BUILTIN
            .get(key.as_str())
            .map(|lemmas| lemmas.iter().map(|l| l.to_string()).collect())
            .unwrap_or_default();
        if let Some(extra) = self.extra.get(&key) {
            out.extend(extra.iter().cloned());
        }
        out
    }
}
