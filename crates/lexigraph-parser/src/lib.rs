//! Content parser for Lexigraph.
//!
//! Turns raw text into a word graph: one node per distinct non-stop-word with
//! its occurrence count as weight, and `co_occurrence` edges between words
//! that appear within a sliding window of each other.
//!
//! Parsing never fails. When the input cannot be tokenized (invalid UTF-8,
//! binary data) the parser falls back to a frequency-only graph with zero
//! edges and reports a [`Warning::ParseDegraded`].
//!
//! # Example
//!
//! ```
//! use lexigraph_parser::{SourceType, parse};
//!
//! let parsed = parse("Ideas is about cringe proof. It's a game about news.", SourceType::Post);
//! let graph = parsed.graph();
//!
//! assert!(graph.contains_node("cringe"));
//! assert!(!graph.contains_node("about"));
//! assert!(parsed.warnings().is_empty());
//! ```

pub mod error;
pub mod stop_words;

mod builder;
mod lexer;
mod preprocess;
mod source_type;

pub use error::UnknownSourceType;
pub use source_type::SourceType;

use log::{debug, info, warn};

use lexigraph_core::{graph::Graph, warning::Warning};

use builder::Token;
use error::LexError;

/// Default size of the co-occurrence window.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Tuning knobs for the content parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    window_size: usize,
    min_token_length: usize,
    extra_stop_words: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_token_length: 2,
            extra_stop_words: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the co-occurrence window size. Sizes below 2 produce no edges.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the minimum number of characters a token needs to become a node.
    pub fn with_min_token_length(mut self, min_token_length: usize) -> Self {
        self.min_token_length = min_token_length;
        self
    }

    /// Add stop words on top of the built-in list.
    pub fn with_extra_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_stop_words
            .extend(words.into_iter().map(|w| lexer::normalize_word(w.as_ref())));
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn min_token_length(&self) -> usize {
        self.min_token_length
    }

    pub fn extra_stop_words(&self) -> &[String] {
        &self.extra_stop_words
    }

    fn keeps(&self, word: &str) -> bool {
        word.chars().count() >= self.min_token_length
            && !stop_words::is_stop_word(word)
            && !self.extra_stop_words.iter().any(|w| w == word)
    }
}

/// The output of a parse: the graph plus any warnings raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    graph: Graph,
    warnings: Vec<Warning>,
}

impl Parsed {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns `true` if the parser fell back to a frequency-only graph.
    pub fn is_degraded(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, Warning::ParseDegraded { .. }))
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }
}

/// Stateless parser holding a [`ParserConfig`].
#[derive(Debug, Clone, Default)]
pub struct ContentParser {
    config: ParserConfig,
}

impl ContentParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse UTF-8 text into a co-occurrence graph.
    pub fn parse(&self, text: &str, source_type: SourceType) -> Parsed {
        info!(
            source_type = source_type.as_str(),
            bytes = text.len();
            "Parsing content"
        );

        let cleaned = preprocess::clean_text(text, source_type);
        match lexer::tokenize(&cleaned) {
            Ok(words) => {
                let tokens = self.filter(
                    words.iter().map(|w| w.text).collect::<Vec<_>>(),
                    source_type,
                );
                let graph = builder::co_occurrence_graph(&tokens, self.config.window_size);
                debug!(
                    tokens = tokens.len(),
                    nodes = graph.node_count(),
                    edges = graph.edge_count();
                    "Content parsed"
                );
                Parsed {
                    graph,
                    warnings: Vec::new(),
                }
            }
            Err(err) => self.degrade(&cleaned, source_type, err),
        }
    }

    /// Parse raw bytes. Invalid UTF-8 degrades to a frequency-only graph
    /// built from a lossy decoding.
    pub fn parse_bytes(&self, bytes: &[u8], source_type: SourceType) -> Parsed {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.parse(text, source_type),
            Err(err) => {
                let lossy = String::from_utf8_lossy(bytes);
                let cleaned = preprocess::clean_text(&lossy, source_type);
                self.degrade(
                    &cleaned,
                    source_type,
                    LexError::InvalidEncoding(err.valid_up_to()),
                )
            }
        }
    }

    fn degrade(&self, text: &str, source_type: SourceType, err: LexError) -> Parsed {
        warn!(reason = err.to_string(); "Tokenization failed, falling back to word frequencies");

        let words: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric() && c != '\'' && c != '\u{2019}')
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty())
            .collect();
        let tokens = self.filter(words, source_type);

        Parsed {
            graph: builder::frequency_graph(&tokens),
            warnings: vec![Warning::ParseDegraded {
                reason: err.to_string(),
            }],
        }
    }

    /// Applies identifier splitting, source-type refinement, stop words and
    /// the length threshold.
    fn filter(&self, words: Vec<&str>, source_type: SourceType) -> Vec<Token> {
        let surfaces: Vec<&str> = match source_type {
            SourceType::Code => words
                .into_iter()
                .flat_map(preprocess::split_identifier)
                .collect(),
            _ => words,
        };

        let normalized: Vec<String> = surfaces.iter().map(|w| lexer::normalize_word(w)).collect();
        let refined = preprocess::refine_words(normalized.clone(), source_type);

        // Refinement only removes words, so walk both lists to recover surfaces.
        let mut refined = refined.into_iter().peekable();
        let mut tokens = Vec::new();
        for (surface, id) in surfaces.iter().zip(normalized) {
            if refined.peek() != Some(&id) {
                continue;
            }
            refined.next();
            if self.config.keeps(&id) {
                tokens.push(Token {
                    id,
                    surface: surface.to_string(),
                });
            }
        }
        tokens
    }
}

/// Parse text with the default [`ParserConfig`].
pub fn parse(text: &str, source_type: SourceType) -> Parsed {
    ContentParser::default().parse(text, source_type)
}

/// Parse raw bytes with the default [`ParserConfig`].
pub fn parse_bytes(bytes: &[u8], source_type: SourceType) -> Parsed {
    ContentParser::default().parse_bytes(bytes, source_type)
}
