//! Non-fatal conditions raised while building a graph.
//!
//! Pipeline stages contain their failures locally: instead of returning an
//! error they degrade and report a [`Warning`]. Each warning carries a
//! [`Severity`] so callers can decide what to surface.

use std::fmt;

/// The severity level of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Output was produced but is degraded.
    Warning,

    /// Expected behaviour worth recording, such as a word nobody could expand.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A non-fatal condition reported by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Tokenization failed; the graph carries word frequencies but no edges.
    ParseDegraded { reason: String },

    /// No semantic source produced relationships for this word.
    ExtractionSkipped { word: String },

    /// Coincident nodes were separated with a small random offset.
    LayoutDegenerate { resolutions: usize },
}

impl Warning {
    /// Returns the severity of this warning.
    pub fn severity(&self) -> Severity {
        match self {
            Warning::ParseDegraded { .. } | Warning::LayoutDegenerate { .. } => Severity::Warning,
            Warning::ExtractionSkipped { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ParseDegraded { reason } => {
                write!(f, "parse degraded to word frequencies only: {reason}")
            }
            Warning::ExtractionSkipped { word } => {
                write!(f, "no semantic source expanded `{word}`")
            }
            Warning::LayoutDegenerate { resolutions } => {
                write!(f, "separated coincident nodes {resolutions} time(s)")
            }
        }
    }
}
