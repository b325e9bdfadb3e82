//! Error types for the content parser.
//!
//! Parsing itself never fails: lexer errors are caught by the parser and
//! turned into a [`ParseDegraded`](lexigraph_core::warning::Warning::ParseDegraded)
//! warning. The only error a caller can see is an unrecognised source type tag.

use thiserror::Error;

/// A `source_type` tag that does not name a known [`SourceType`](crate::SourceType).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown source type `{0}` (expected voice_transcript, code, markdown or post)")]
pub struct UnknownSourceType(pub String);

/// Reasons tokenization can fail before graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum LexError {
    #[error("input is not valid UTF-8 (first invalid byte at offset {0})")]
    InvalidEncoding(usize),

    #[error("input looks like binary data ({0} control characters)")]
    Binary(usize),

    #[error("lexer stopped at byte offset {0}")]
    Incomplete(usize),
}
