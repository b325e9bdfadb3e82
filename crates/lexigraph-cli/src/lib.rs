//! Lexigraph CLI library
//!
//! This module contains the core CLI logic for the Lexigraph knowledge graph
//! tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{info, warn};
use tempfile::NamedTempFile;

use lexigraph::{GraphBuilder, LexigraphError, config::AppConfig};

/// Run the Lexigraph CLI application
///
/// This function reads the input file, runs it through the Lexigraph
/// pipeline and writes the rendered artifact to the output file. The output
/// is written to a temporary file next to the destination and then moved into
/// place, so a failed run never leaves a partial file behind.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns `LexigraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<PathBuf, LexigraphError> {
    let output = output_path(args);
    info!(
        input_path = args.input,
        output_path = output.display().to_string(),
        format = args.format.as_str();
        "Processing input"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args);

    let content = fs::read(&args.input)?;

    let builder = GraphBuilder::new(app_config)?;
    let result = builder.run_bytes(&content, args.source_type, args.format)?;

    for warning in result.warnings() {
        warn!(severity = warning.severity().to_string(); "{warning}");
    }

    write_atomically(&output, result.artifact().content())?;

    info!(
        output_file = output.display().to_string(),
        nodes = result.graph().node_count(),
        edges = result.graph().edge_count();
        "Graph exported successfully"
    );

    Ok(output)
}

/// The explicit output path, or the input path with the format's extension.
fn output_path(args: &Args) -> PathBuf {
    match &args.output {
        Some(output) => PathBuf::from(output),
        None => Path::new(&args.input).with_extension(args.format.extension()),
    }
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(max_words) = args.max_words {
        config.semantic_mut().set_max_words(max_words);
    }
    if args.no_semantic {
        config.semantic_mut().disable_sources();
    }
    if let Some(iterations) = args.iterations {
        config.layout_mut().set_iterations(iterations);
    }
    if args.seed.is_some() {
        config.layout_mut().set_seed(args.seed);
    }
}

fn write_atomically(path: &Path, content: &[u8]) -> Result<(), LexigraphError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
