//! Error types for Lexigraph operations.
//!
//! This module provides the main error type [`LexigraphError`] which wraps
//! the hard failures of every pipeline stage. Recoverable conditions are
//! reported as [`lexigraph_core::warning::Warning`]s instead.

use std::io;

use thiserror::Error;

use lexigraph_core::graph::GraphError;

use crate::{config::ConfigError, export::RenderError, layout::LayoutError};

/// The main error type for Lexigraph operations.
#[derive(Debug, Error)]
pub enum LexigraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
