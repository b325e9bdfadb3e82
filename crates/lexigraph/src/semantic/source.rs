//! The semantic source capability and the ordered chain of sources.

use std::{fmt, sync::Arc};

use thiserror::Error;

use lexigraph_core::relationship::RelationshipSet;

/// A semantic source could not answer a query.
///
/// The extractor treats every variant the same way: it moves on to the next
/// source in the chain. The variants exist so logs say what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceUnavailable {
    #[error("{source_name}: request timed out")]
    Timeout { source_name: String },

    #[error("{source_name}: transport error: {message}")]
    Transport {
        source_name: String,
        message: String,
    },

    #[error("{source_name}: service responded with HTTP {status}")]
    Status { source_name: String, status: u16 },

    #[error("{source_name}: malformed response: {message}")]
    Malformed {
        source_name: String,
        message: String,
    },

    #[error("{source_name}: no relationships found for `{word}`")]
    NoMatches { source_name: String, word: String },

    #[error("{source_name}: not loaded: {message}")]
    NotLoaded {
        source_name: String,
        message: String,
    },
}

impl SourceUnavailable {
    /// Classifies a `reqwest` failure.
    pub(crate) fn from_reqwest(source_name: &str, err: &reqwest::Error) -> Self {
        let source_name = source_name.to_string();
        if err.is_timeout() {
            Self::Timeout { source_name }
        } else if err.is_decode() {
            Self::Malformed {
                source_name,
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                source_name,
                message: err.to_string(),
            }
        }
    }

    /// Name of the source that failed.
    pub fn source_name(&self) -> &str {
        match self {
            Self::Timeout { source_name }
            | Self::Transport { source_name, .. }
            | Self::Status { source_name, .. }
            | Self::Malformed { source_name, .. }
            | Self::NoMatches { source_name, .. }
            | Self::NotLoaded { source_name, .. } => source_name,
        }
    }
}

/// A provider of typed relationships for a single word.
///
/// Implementations must be safe to share across threads: the same source
/// instance serves every pipeline invocation in the process.
pub trait SemanticSource: Send + Sync {
    /// Stable name of the source, used as part of the cache key.
    fn name(&self) -> &str;

    /// Looks up the relationships of `word`.
    ///
    /// An empty set means the source is healthy but knows nothing about the
    /// word.
    ///
    /// # Errors
    ///
    /// Returns [`SourceUnavailable`] when the source cannot answer at all.
    fn query(&self, word: &str) -> Result<RelationshipSet, SourceUnavailable>;
}

/// Semantic sources in priority order.
#[derive(Clone, Default)]
pub struct SourceChain {
    sources: Vec<Arc<dyn SemanticSource>>,
}

impl SourceChain {
    /// Creates a chain that consults `sources` in the given order.
    pub fn new(sources: Vec<Arc<dyn SemanticSource>>) -> Self {
        Self { sources }
    }

    /// Appends a source with the lowest priority so far.
    pub fn with_source(mut self, source: Arc<dyn SemanticSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn SemanticSource>> {
        self.sources.iter()
    }

    /// Names of the sources, highest priority first.
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for SourceChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
