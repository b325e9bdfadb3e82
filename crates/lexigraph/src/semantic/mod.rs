//! Semantic expansion: sources, the shared answer cache and the extractor.
//!
//! The [`SemanticExtractor`] picks the heaviest words of a graph and asks a
//! [`SourceChain`] about each of them. Every source answer goes through the
//! [`SemanticCache`], which the caller creates once and shares across
//! pipeline runs.

mod cache;
mod extractor;
mod source;
pub mod sources;

pub use cache::{CacheEntry, DEFAULT_TTL, SemanticCache};
pub use extractor::{SEMANTIC_EDGE_WEIGHT, SemanticExpansion, SemanticExtractor};
pub use source::{SemanticSource, SourceChain, SourceUnavailable};
