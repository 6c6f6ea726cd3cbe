use std::io::Write;

use proptest::prelude::*;
use review_insights::nlp::{
    synonyms::{SynonymSource, Thesaurus},
    topics::{expand_keywords, Topic, TopicVocabulary},
};

struct FixedSynonyms;

impl SynonymSource for FixedSynonyms {
    fn synonyms(&self, word: &str) -> Vec<String> {
        match word {
            "box" => vec!["carton".into(), "Gift_Box".into(), "box".into(), " ".into()],
            _ => Vec::new(),
        }
    }
}

fn vocabulary() -> TopicVocabulary {
    TopicVocabulary::expanded(&Thesaurus::builtin())
}

#[test]
fn expansion_keeps_seeds_first_and_normalises_lemmas() {
    let expanded = expand_keywords(&["box", "cap"], &FixedSynonyms);
    assert_eq!(expanded, vec!["box", "cap", "carton", "gift box"]);
}

#[test]
fn builtin_vocabulary_widens_every_keyed_topic() {
    let vocabulary = vocabulary();
    for topic in Topic::KEYED {
        let keywords = vocabulary.keywords(topic);
        assert!(keywords.len() > topic.seeds().len(), "{topic} was not expanded");
        assert_eq!(&keywords[..topic.seeds().len()], topic.seeds());
    }
    assert!(vocabulary.keywords(Topic::Flavour).contains(&"flavor".to_string()));
    assert!(vocabulary.keywords(Topic::Other).is_empty());
}

#[test]
fn reviews_can_carry_several_topics() {
    let topics = vocabulary().assign_topics("The taste is great but the bottle arrived broken");
    assert_eq!(topics, vec![Topic::Flavour, Topic::Packaging]);
}

#[test]
fn synonyms_trigger_their_topic() {
    let topics = vocabulary().assign_topics("Way too PRICEY for what it is");
    assert_eq!(topics, vec![Topic::Price]);
}

#[test]
fn unmatched_reviews_fall_back_to_other() {
    assert_eq!(vocabulary().assign_topics("Arrived on Tuesday."), vec![Topic::Other]);
    assert_eq!(vocabulary().assign_topics(""), vec![Topic::Other]);
}

#[test]
fn extra_synonyms_file_is_merged() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"Cheap": ["steal"]}}"#).unwrap();
    let thesaurus = Thesaurus::with_extra_file(file.path()).unwrap();
    let synonyms = thesaurus.synonyms("cheap");
    assert!(synonyms.contains(&"steal".to_string()));
    assert!(synonyms.contains(&"inexpensive".to_string()));

    let vocabulary = TopicVocabulary::expanded(&thesaurus);
    assert_eq!(vocabulary.assign_topics("what a steal"), vec![Topic::Price]);
}

#[test]
fn topic_names_parse() {
    assert_eq!("Price".parse::<Topic>().unwrap(), Topic::Price);
    assert_eq!(" other ".parse::<Topic>().unwrap(), Topic::Other);
    assert!("shipping".parse::<Topic>().is_err());
}

proptest! {
    #[test]
    fn every_review_gets_at_least_one_topic(text in ".{0,80}") {
        let topics = vocabulary().assign_topics(&text);
        prop_assert!(!topics.is_empty());
        prop_assert!(topics == vec![Topic::Other] || !topics.contains(&Topic::Other));
    }
}
