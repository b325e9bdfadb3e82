//! Built-in dictionary of common words. The last resort of the chain.

use log::debug;

use lexigraph_core::{graph::RelationType, relationship::RelationshipSet};

use crate::semantic::source::{SemanticSource, SourceUnavailable};

pub const NAME: &str = "static_fallback";

struct Entry {
    word: &'static str,
    is_a: &'static [&'static str],
    has_attribute: &'static [&'static str],
    used_for: &'static [&'static str],
    related_to: &'static [&'static str],
}

const fn entry(
    word: &'static str,
    is_a: &'static [&'static str],
    has_attribute: &'static [&'static str],
    used_for: &'static [&'static str],
    related_to: &'static [&'static str],
) -> Entry {
    Entry {
        word,
        is_a,
        has_attribute,
        used_for,
        related_to,
    }
}

#[rustfmt::skip]
const DICTIONARY: &[Entry] = &[
    entry("game", &["activity"], &["rules", "players"], &["entertainment"], &["play", "sport"]),
    entry("news", &["information"], &["headline", "source"], &["informing"], &["media", "journalism"]),
    entry("idea", &["thought"], &["originality"], &["innovation"], &["concept", "plan"]),
    entry("book", &["publication"], &["pages", "author"], &["reading"], &["story", "library"]),
    entry("music", &["art"], &["rhythm", "melody"], &["entertainment"], &["song", "sound"]),
    entry("computer", &["machine"], &["processor", "memory"], &["computation"], &["software", "hardware"]),
    entry("code", &["text"], &["syntax"], &["programming"], &["software", "program"]),
    entry("software", &["product"], &["features", "bugs"], &["automation"], &["code", "application"]),
    entry("data", &["information"], &["structure"], &["analysis"], &["database", "record"]),
    entry("language", &["system"], &["grammar", "vocabulary"], &["communication"], &["speech", "writing"]),
    entry("car", &["vehicle"], &["wheels", "engine"], &["transport"], &["road", "driver"]),
    entry("city", &["settlement"], &["population", "streets"], &["living"], &["town", "urban"]),
    entry("food", &["substance"], &["flavor", "nutrients"], &["eating"], &["meal", "cooking"]),
    entry("water", &["liquid"], &["temperature"], &["drinking"], &["ocean", "river"]),
    entry("team", &["group"], &["members", "leader"], &["collaboration"], &["sport", "work"]),
    entry("school", &["institution"], &["teachers", "students"], &["education"], &["learning", "class"]),
    entry("money", &["currency"], &["value"], &["trade"], &["bank", "price"]),
    entry("phone", &["device"], &["screen", "battery"], &["communication"], &["call", "mobile"]),
    entry("movie", &["artwork"], &["plot", "actors"], &["entertainment"], &["film", "cinema"]),
    entry("art", &["creation"], &["style"], &["expression"], &["painting", "design"]),
    entry("sport", &["activity"], &["rules", "teams"], &["exercise"], &["game", "competition"]),
    entry("health", &["condition"], &["fitness"], &["wellbeing"], &["medicine", "body"]),
    entry("science", &["discipline"], &["methods", "theories"], &["discovery"], &["research", "knowledge"]),
    entry("graph", &["structure"], &["nodes", "edges"], &["modeling"], &["network", "chart"]),
    entry("proof", &["evidence"], &["steps"], &["verification"], &["argument", "logic"]),
    entry("story", &["narrative"], &["characters", "plot"], &["storytelling"], &["tale", "fiction"]),
];

/// A fixed, in-memory dictionary that never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFallback;

impl StaticFallback {
    pub fn new() -> Self {
        Self
    }

    /// Number of words in the dictionary.
    pub fn len(&self) -> usize {
        DICTIONARY.len()
    }

    pub fn is_empty(&self) -> bool {
        DICTIONARY.is_empty()
    }
}

impl SemanticSource for StaticFallback {
    fn name(&self) -> &str {
        NAME
    }

    fn query(&self, word: &str) -> Result<RelationshipSet, SourceUnavailable> {
        let word = word.trim().to_lowercase();
        let Some(entry) = DICTIONARY.iter().find(|entry| entry.word == word) else {
            debug!(source = NAME, word = word.as_str(); "Word not in dictionary");
            return Ok(RelationshipSet::new());
        };

        let mut set = RelationshipSet::new();
        let buckets = [
            (RelationType::IsA, entry.is_a),
            (RelationType::HasAttribute, entry.has_attribute),
            (RelationType::UsedFor, entry.used_for),
            (RelationType::RelatedTo, entry.related_to),
        ];
        for (relation, terms) in buckets {
            for term in terms {
                set.insert(relation, term);
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_is_an_activity() {
        let set = StaticFallback.query("game").unwrap();

        assert!(set.is_a().contains("activity"));
        assert!(set.has_attribute().contains("rules"));
        assert!(set.used_for().contains("entertainment"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(
            StaticFallback.query("  GAME ").unwrap(),
            StaticFallback.query("game").unwrap()
        );
    }

    #[test]
    fn test_unknown_word_is_empty_not_error() {
        assert!(StaticFallback.query("cringe").unwrap().is_empty());
    }

    #[test]
    fn test_dictionary_words_are_unique_and_nonempty() {
        let mut words: Vec<&str> = DICTIONARY.iter().map(|entry| entry.word).collect();
        words.sort_unstable();
        words.dedup();

        assert_eq!(words.len(), StaticFallback.len());
        for word in words {
            assert!(!StaticFallback.query(word).unwrap().is_empty(), "{word}");
        }
    }
}
