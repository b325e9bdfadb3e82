//! Semantic source backed by a local, read-only lexical dataset.
//!
//! The dataset is a JSON document mapping words to WordNet style relations:
//!
//! ```json
//! {
//!   "game": {
//!     "hypernyms": ["activity"],
//!     "synonyms": ["match"],
//!     "meronyms": ["move"],
//!     "attributes": ["rules"],
//!     "uses": ["entertainment"]
//!   }
//! }
//! ```

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use lexigraph_core::{graph::RelationType, relationship::RelationshipSet};

use crate::{
    config::LexicalDbConfig,
    semantic::source::{SemanticSource, SourceUnavailable},
};

pub const NAME: &str = "lexical_db";

/// Failure to load a lexical dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read lexical dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid lexical dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LexicalEntry {
    hypernyms: Vec<String>,
    synonyms: Vec<String>,
    meronyms: Vec<String>,
    attributes: Vec<String>,
    uses: Vec<String>,
}

impl From<LexicalEntry> for RelationshipSet {
    fn from(entry: LexicalEntry) -> Self {
        let mut set = RelationshipSet::new();
        let buckets = [
            (RelationType::IsA, entry.hypernyms),
            (RelationType::HasAttribute, entry.meronyms),
            (RelationType::HasAttribute, entry.attributes),
            (RelationType::UsedFor, entry.uses),
            (RelationType::RelatedTo, entry.synonyms),
        ];
        for (relation, terms) in buckets {
            for term in terms {
                set.insert(relation, &term);
            }
        }
        set
    }
}

/// Deterministic lookups in an in-memory lexical dataset.
#[derive(Debug, Clone)]
pub struct LexicalDb {
    entries: Option<HashMap<String, RelationshipSet>>,
    unloaded_reason: String,
}

impl LexicalDb {
    /// Loads the dataset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self::from_json(&json)?;
        info!(path:? = path, words = db.word_count(); "Lexical dataset loaded");
        Ok(db)
    }

    /// Parses a dataset from a JSON string.
    ///
    /// Keys differing only in case or surrounding whitespace are merged.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let raw: HashMap<String, LexicalEntry> = serde_json::from_str(json)?;
        let mut entries: HashMap<String, RelationshipSet> = HashMap::with_capacity(raw.len());
        for (word, entry) in raw {
            let relationships = RelationshipSet::from(entry);
            let merged = entries.entry(word.trim().to_lowercase()).or_default();
            for (relation, term) in relationships.iter() {
                merged.insert(relation, term);
            }
        }
        Ok(Self {
            entries: Some(entries),
            unloaded_reason: String::new(),
        })
    }

    /// A source without a dataset. Every query fails with
    /// [`SourceUnavailable::NotLoaded`].
    pub fn unloaded(reason: impl Into<String>) -> Self {
        Self {
            entries: None,
            unloaded_reason: reason.into(),
        }
    }

    /// Loads the configured dataset, degrading to an unloaded source when the
    /// path is missing or unreadable.
    pub fn from_config(config: &LexicalDbConfig) -> Self {
        let Some(path) = config.dataset_path() else {
            return Self::unloaded("no dataset_path configured");
        };
        match Self::from_path(path) {
            Ok(db) => db,
            Err(err) => {
                warn!(path:? = path, err:% = err; "Lexical dataset unavailable");
                Self::unloaded(err.to_string())
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    pub fn word_count(&self) -> usize {
        self.entries.as_ref().map_or(0, HashMap::len)
    }
}

/// The word itself followed by naive singular forms.
fn lookup_forms(word: &str) -> Vec<String> {
    let mut forms = vec![word.to_string()];
    if let Some(stem) = word.strip_suffix("ies") {
        forms.push(format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("es") {
        forms.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        forms.push(stem.to_string());
    }
    forms.retain(|form| !form.is_empty());
    forms
}

impl SemanticSource for LexicalDb {
    fn name(&self) -> &str {
        NAME
    }

    fn query(&self, word: &str) -> Result<RelationshipSet, SourceUnavailable> {
        let entries = self
            .entries
            .as_ref()
            .ok_or_else(|| SourceUnavailable::NotLoaded {
                source_name: NAME.to_string(),
                message: self.unloaded_reason.clone(),
            })?;

        let word = word.trim().to_lowercase();
        let found = lookup_forms(&word)
            .into_iter()
            .find_map(|form| entries.get(&form).map(|set| (form, set)));

        match found {
            Some((form, set)) => {
                debug!(source = NAME, word = word.as_str(), form = form.as_str(); "Dataset hit");
                Ok(set.clone())
            }
            None => Ok(RelationshipSet::new()),
        }
    }
}
