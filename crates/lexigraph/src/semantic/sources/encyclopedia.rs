//! Semantic source backed by an encyclopedia summary endpoint.
//!
//! Fetches `{base_url}/{word}` (the Wikipedia REST `page/summary` shape, a
//! JSON object with an `extract` field) and mines the extract with a handful
//! of phrase patterns.

use std::{sync::LazyLock, time::Duration};

use log::{debug, trace};
use regex::Regex;
use reqwest::{Url, blocking::Client};
use serde::Deserialize;

use lexigraph_core::{graph::RelationType, relationship::RelationshipSet};

use crate::{
    config::{ConfigError, EncyclopediaConfig},
    semantic::source::{SemanticSource, SourceUnavailable},
};

pub const NAME: &str = "encyclopedia";

/// Longest phrase kept from a pattern match, in words.
const MAX_PHRASE_WORDS: usize = 3;

/// Words that end a captured phrase.
const PHRASE_BREAKS: &[&str] = &[
    "and", "or", "but", "that", "which", "who", "whose", "where", "when", "of", "in", "on", "at",
    "by", "for", "from", "to", "with", "as", "is", "are", "was", "were", "used", "known",
    "called", "such",
];

const LEADING_DETERMINERS: &[&str] = &["a", "an", "the", "many", "several", "some", "two", "its"];

static PATTERNS: LazyLock<Vec<(RelationType, Regex)>> = LazyLock::new(|| {
    [
        (
            RelationType::IsA,
            r"(?i)\b(?:is|are|was|were)\s+(?:a|an|the)\s+([a-z][a-z\s'-]*)",
        ),
        (
            RelationType::HasAttribute,
            r"(?i)\b(?:has|have|with)\s+([a-z][a-z\s'-]*)",
        ),
        (
            RelationType::UsedFor,
            r"(?i)\bused\s+(?:for|to|in)\s+([a-z][a-z\s'-]*)",
        ),
        (
            RelationType::RelatedTo,
            r"(?i)\b(?:known\s+as|called|such\s+as)\s+([a-z][a-z\s'-]*)",
        ),
    ]
    .into_iter()
    .map(|(relation, pattern)| {
        let regex = Regex::new(pattern).expect("encyclopedia patterns are valid regexes");
        (relation, regex)
    })
    .collect()
});

#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    extract: String,
}

/// HTTP client for an encyclopedia summary endpoint.
#[derive(Debug, Clone)]
pub struct Encyclopedia {
    client: Client,
    base_url: Url,
}

impl Encyclopedia {
    /// Creates a source fetching summaries below `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `base_url` is not an absolute HTTP URL or
    /// the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "semantic.encyclopedia.base_url",
                message: format!("`{base_url}` is not an absolute URL"),
            })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConfigError::HttpClient {
                source_name: NAME,
                message: err.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &EncyclopediaConfig) -> Result<Self, ConfigError> {
        Self::new(config.base_url(), config.timeout())
    }

    fn article_url(&self, word: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(word);
        }
        url
    }
}

impl SemanticSource for Encyclopedia {
    fn name(&self) -> &str {
        NAME
    }

    fn query(&self, word: &str) -> Result<RelationshipSet, SourceUnavailable> {
        let url = self.article_url(word);
        debug!(source = NAME, word = word, url = url.as_str(); "Querying source");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| SourceUnavailable::from_reqwest(NAME, &err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceUnavailable::Status {
                source_name: NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let summary: Summary = response
            .json()
            .map_err(|err| SourceUnavailable::from_reqwest(NAME, &err))?;
        trace!(source = NAME, extract = summary.extract.as_str(); "Source response");

        let set = extract_relationships(word, &summary.extract);
        if set.is_empty() {
            return Err(SourceUnavailable::NoMatches {
                source_name: NAME.to_string(),
                word: word.to_string(),
            });
        }
        Ok(set)
    }
}

/// Applies the phrase patterns to an article extract.
pub(crate) fn extract_relationships(word: &str, extract: &str) -> RelationshipSet {
    let mut set = RelationshipSet::new();
    for (relation, regex) in PATTERNS.iter() {
        for captures in regex.captures_iter(extract) {
            let Some(phrase) = captures.get(1).and_then(|m| head_phrase(m.as_str())) else {
                continue;
            };
            if !phrase.eq_ignore_ascii_case(word) {
                set.insert(*relation, &phrase);
            }
        }
    }
    set
}

/// Cuts a captured run of words down to its leading noun phrase.
fn head_phrase(captured: &str) -> Option<String> {
    let words: Vec<String> = captured
        .split_whitespace()
        .map(str::to_lowercase)
        .skip_while(|word| LEADING_DETERMINERS.contains(&word.as_str()))
        .take_while(|word| !PHRASE_BREAKS.contains(&word.as_str()))
        .take(MAX_PHRASE_WORDS)
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}
