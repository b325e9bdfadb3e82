//! Configuration types for the Lexigraph pipeline.
//!
//! Every section implements [`serde::Deserialize`] with defaults for each
//! field, so a configuration file only needs to name what it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ParsingConfig`] - Co-occurrence window and token filtering.
//! - [`SemanticConfig`] - Expansion budget, cache TTL and the semantic sources.
//! - [`LayoutConfig`] - Canvas size, iteration budget and seed.
//! - [`RenderConfig`] - ASCII grid size and colours.
//!
//! # Example
//!
//! ```
//! # use lexigraph::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.semantic().max_words(), 10);
//! assert!(config.validate().is_ok());
//! ```

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use lexigraph_core::color::Color;
use lexigraph_parser::ParserConfig;

use crate::semantic::SemanticCache;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid color for `{field}`: {message}")]
    InvalidColor { field: &'static str, message: String },

    #[error("invalid value for `{field}`: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("failed to build HTTP client for {source_name}: {message}")]
    HttpClient {
        source_name: &'static str,
        message: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    parser: ParsingConfig,

    #[serde(default)]
    semantic: SemanticConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    pub fn new(
        parser: ParsingConfig,
        semantic: SemanticConfig,
        layout: LayoutConfig,
        render: RenderConfig,
    ) -> Self {
        Self {
            parser,
            semantic,
            layout,
            render,
        }
    }

    pub fn parser(&self) -> &ParsingConfig {
        &self.parser
    }

    pub fn semantic(&self) -> &SemanticConfig {
        &self.semantic
    }

    pub fn semantic_mut(&mut self) -> &mut SemanticConfig {
        &mut self.semantic
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Checks values serde cannot check: cache lifetime, timeouts, canvas
    /// size and colours.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.semantic.validate()?;
        self.layout.validate()?;
        self.render.validate()
    }
}

/// Content parser settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    window_size: usize,
    min_token_length: usize,
    extra_stop_words: Vec<String>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        let defaults = ParserConfig::default();
        Self {
            window_size: defaults.window_size(),
            min_token_length: defaults.min_token_length(),
            extra_stop_words: Vec::new(),
        }
    }
}

impl ParsingConfig {
    /// Converts these settings into the parser's own configuration.
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::new()
            .with_window_size(self.window_size)
            .with_min_token_length(self.min_token_length)
            .with_extra_stop_words(&self.extra_stop_words)
    }
}

/// Semantic expansion settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Maximum number of words expanded per graph.
    max_words: usize,

    /// Lifetime of a cached source answer, in seconds.
    cache_ttl_secs: u64,

    local_reasoner: LocalReasonerConfig,
    lexical_db: LexicalDbConfig,
    encyclopedia: EncyclopediaConfig,
    static_fallback: StaticFallbackConfig,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            max_words: 10,
            cache_ttl_secs: 24 * 60 * 60,
            local_reasoner: LocalReasonerConfig::default(),
            lexical_db: LexicalDbConfig::default(),
            encyclopedia: EncyclopediaConfig::default(),
            static_fallback: StaticFallbackConfig::default(),
        }
    }
}

impl SemanticConfig {
    pub fn max_words(&self) -> usize {
        self.max_words
    }

    pub fn set_max_words(&mut self, max_words: usize) -> &mut Self {
        self.max_words = max_words;
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn local_reasoner(&self) -> &LocalReasonerConfig {
        &self.local_reasoner
    }

    pub fn lexical_db(&self) -> &LexicalDbConfig {
        &self.lexical_db
    }

    pub fn encyclopedia(&self) -> &EncyclopediaConfig {
        &self.encyclopedia
    }

    pub fn static_fallback(&self) -> &StaticFallbackConfig {
        &self.static_fallback
    }

    /// Disables every semantic source.
    pub fn disable_sources(&mut self) -> &mut Self {
        self.local_reasoner.enabled = false;
        self.lexical_db.enabled = false;
        self.encyclopedia.enabled = false;
        self.static_fallback.enabled = false;
        self
    }

    /// Enables only the built-in static dictionary.
    pub fn static_only(&mut self) -> &mut Self {
        self.disable_sources();
        self.static_fallback.enabled = true;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let max_ttl = SemanticCache::MAX_TTL.as_secs();
        if self.cache_ttl_secs > max_ttl {
            return Err(ConfigError::InvalidValue {
                field: "semantic.cache_ttl_secs",
                message: format!("must be at most {max_ttl}, got {}", self.cache_ttl_secs),
            });
        }
        for (field, timeout_secs) in [
            ("semantic.local_reasoner.timeout_secs", self.local_reasoner.timeout_secs),
            ("semantic.encyclopedia.timeout_secs", self.encyclopedia.timeout_secs),
        ] {
            if timeout_secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: "timeout must be at least one second".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Local reasoning service (Ollama style `/api/generate` endpoint).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalReasonerConfig {
    enabled: bool,
    endpoint: String,
    model: Option<String>,
    timeout_secs: u64,
}

impl Default for LocalReasonerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: Some("llama3.2".to_string()),
            timeout_secs: 10,
        }
    }
}

impl LocalReasonerConfig {
    pub fn new(endpoint: impl Into<String>, model: Option<String>, timeout: Duration) -> Self {
        Self {
            enabled: true,
            endpoint: endpoint.into(),
            model,
            timeout_secs: timeout.as_secs().max(1),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Local lexical dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LexicalDbConfig {
    enabled: bool,
    dataset_path: Option<PathBuf>,
}

impl Default for LexicalDbConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dataset_path: None,
        }
    }
}

impl LexicalDbConfig {
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            dataset_path: Some(dataset_path.into()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn dataset_path(&self) -> Option<&PathBuf> {
        self.dataset_path.as_ref()
    }
}

/// Encyclopedia summary endpoint (Wikipedia REST shaped).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncyclopediaConfig {
    enabled: bool,
    base_url: String,
    timeout_secs: u64,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://en.wikipedia.org/api/rest_v1/page/summary".to_string(),
            timeout_secs: 5,
        }
    }
}

impl EncyclopediaConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            enabled: true,
            base_url: base_url.into(),
            timeout_secs: timeout.as_secs().max(1),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFallbackConfig {
    enabled: bool,
}

impl Default for StaticFallbackConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl StaticFallbackConfig {
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

/// Canvas and simulation settings for the force layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    width: f64,
    height: f64,
    iterations: usize,
    seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            iterations: 100,
            seed: None,
        }
    }
}

impl LayoutConfig {
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    pub fn set_seed(&mut self, seed: Option<u64>) -> &mut Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("layout.width", self.width), ("layout.height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: format!("canvas dimensions must be positive, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Output settings shared by the renderers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    ascii_columns: usize,
    ascii_rows: usize,
    original_color: String,
    semantic_color: String,
    edge_color: String,
    background_color: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ascii_columns: 80,
            ascii_rows: 24,
            original_color: "#4a90d9".to_string(),
            semantic_color: "#e8a33d".to_string(),
            edge_color: "#9aa5b1".to_string(),
            background_color: None,
        }
    }
}

impl RenderConfig {
    pub fn ascii_columns(&self) -> usize {
        self.ascii_columns
    }

    pub fn ascii_rows(&self) -> usize {
        self.ascii_rows
    }

    /// Fill colour of nodes taken from the source text.
    pub fn original_color(&self) -> Result<Color, ConfigError> {
        parse_color("render.original_color", &self.original_color)
    }

    /// Fill colour of nodes added by semantic expansion.
    pub fn semantic_color(&self) -> Result<Color, ConfigError> {
        parse_color("render.semantic_color", &self.semantic_color)
    }

    pub fn edge_color(&self) -> Result<Color, ConfigError> {
        parse_color("render.edge_color", &self.edge_color)
    }

    /// Returns the background colour, or `None` for a transparent canvas.
    pub fn background_color(&self) -> Result<Option<Color>, ConfigError> {
        self.background_color
            .as_deref()
            .map(|color| parse_color("render.background_color", color))
            .transpose()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.original_color()?;
        self.semantic_color()?;
        self.edge_color()?;
        self.background_color()?;
        if self.ascii_columns == 0 || self.ascii_rows == 0 {
            return Err(ConfigError::InvalidValue {
                field: "render.ascii_columns",
                message: "the ASCII grid needs at least one row and one column".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::new(value).map_err(|message| ConfigError::InvalidColor { field, message })
}
