//! Command-line argument definitions for the Lexigraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input and its source type, the output
//! format and path, configuration overrides, and logging verbosity.

use clap::Parser;

use lexigraph::{SourceType, export::RenderFormat};

/// Command-line arguments for the Lexigraph knowledge graph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input text file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Kind of content (voice_transcript, code, markdown, post)
    #[arg(short, long, default_value = "markdown")]
    pub source_type: SourceType,

    /// Output format (html, svg, json, ascii)
    #[arg(short, long, default_value = "html")]
    pub format: RenderFormat,

    /// Path to the output file. Defaults to the input path with the format's
    /// extension.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Maximum number of words to expand semantically
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Number of force layout iterations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Seed for a reproducible layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip semantic expansion entirely
    #[arg(long)]
    pub no_semantic: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Arguments for `input` with every other option at its default.
    pub fn for_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            source_type: SourceType::default(),
            format: RenderFormat::Html,
            output: None,
            config: None,
            max_words: None,
            iterations: None,
            seed: None,
            no_semantic: false,
            log_level: "info".to_string(),
        }
    }
}
