//! The built-in semantic sources.
//!
//! Sources are consulted in a fixed priority order:
//!
//! 1. [`LocalReasoner`] - a local reasoning service over HTTP.
//! 2. [`LexicalDb`] - a local lexical dataset.
//! 3. [`Encyclopedia`] - an encyclopedia summary endpoint.
//! 4. [`StaticFallback`] - a built-in dictionary.

mod encyclopedia;
mod lexical_db;
mod local_reasoner;
mod static_fallback;

pub use encyclopedia::Encyclopedia;
pub use lexical_db::{DatasetError, LexicalDb};
pub use local_reasoner::LocalReasoner;
pub use static_fallback::StaticFallback;

use std::sync::Arc;

use log::info;

use crate::{
    config::{ConfigError, SemanticConfig},
    semantic::source::{SemanticSource, SourceChain},
};

/// Source names in priority order.
pub const PRIORITY: [&str; 4] = [
    local_reasoner::NAME,
    lexical_db::NAME,
    encyclopedia::NAME,
    static_fallback::NAME,
];

impl SourceChain {
    /// Builds the chain of enabled sources, always in [`PRIORITY`] order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an enabled HTTP source has an invalid URL or
    /// its client cannot be built.
    pub fn from_config(config: &SemanticConfig) -> Result<Self, ConfigError> {
        let mut sources: Vec<Arc<dyn SemanticSource>> = Vec::new();

        if config.local_reasoner().enabled() {
            sources.push(Arc::new(LocalReasoner::from_config(config.local_reasoner())?));
        }
        if config.lexical_db().enabled() {
            sources.push(Arc::new(LexicalDb::from_config(config.lexical_db())));
        }
        if config.encyclopedia().enabled() {
            sources.push(Arc::new(Encyclopedia::from_config(config.encyclopedia())?));
        }
        if config.static_fallback().enabled() {
            sources.push(Arc::new(StaticFallback::new()));
        }

        let chain = Self::new(sources);
        info!(sources:? = chain.names(); "Semantic sources ready");
        Ok(chain)
    }
}
