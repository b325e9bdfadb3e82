//! Error adapter for converting LexigraphError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic, LabeledSpan};

use lexigraph::{LexigraphError, export::RenderError, layout::LayoutError};

/// Adapter rendering a [`LexigraphError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a LexigraphError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl Diagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            LexigraphError::Io(_) => "lexigraph::io",
            LexigraphError::Config(_) => "lexigraph::config",
            LexigraphError::Graph(_) => "lexigraph::graph",
            LexigraphError::Layout(_) => "lexigraph::layout",
            LexigraphError::Render(_) => "lexigraph::render",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            LexigraphError::Config(_) => "check the configuration file passed with --config",
            LexigraphError::Layout(LayoutError::InvalidCanvas { .. }) => {
                "layout.width and layout.height must be positive numbers"
            }
            LexigraphError::Render(RenderError::UnsupportedFormat(_)) => {
                "use one of: html, svg, json, ascii"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_code_and_message() {
        let err = LexigraphError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), "I/O error: gone");
        assert_eq!(adapter.code().unwrap().to_string(), "lexigraph::io");
        assert!(adapter.help().is_none());
    }

    #[test]
    fn test_help_for_unsupported_format() {
        let err = LexigraphError::Render(RenderError::UnsupportedFormat("pdf".to_string()));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "lexigraph::render");
        assert!(adapter.help().unwrap().to_string().contains("ascii"));
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = LexigraphError::Layout(LayoutError::InvalidCanvas {
            width: 0.0,
            height: 10.0,
        });
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &ErrorAdapter(&err))
            .unwrap();

        assert!(out.contains("invalid canvas"));
    }
}
