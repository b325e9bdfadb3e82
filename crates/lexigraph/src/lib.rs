//! Lexigraph - turns unstructured text into a knowledge graph.
//!
//! The pipeline has four stages:
//!
//! 1. **Parse**: a co-occurrence graph of salient words ([`lexigraph_parser`])
//! 2. **Expand**: typed relationships from an ordered chain of semantic
//!    sources, cached per `(word, source)` ([`semantic`])
//! 3. **Layout**: Fruchterman-Reingold positions ([`layout`])
//! 4. **Render**: HTML, SVG, JSON or ASCII ([`export`])
//!
//! [`GraphBuilder`] wires the stages together from an [`AppConfig`].

pub mod config;
pub mod export;
pub mod layout;
pub mod semantic;

mod error;

pub use lexigraph_core::{color, geometry, graph, relationship, warning};
pub use lexigraph_parser::{Parsed, SourceType};

pub use error::LexigraphError;

use std::sync::Arc;

use log::{debug, info, trace};

use lexigraph_core::{graph::Graph, warning::Warning};
use lexigraph_parser::ContentParser;

use config::AppConfig;
use export::{RenderArtifact, RenderFormat, RenderStyle, Renderer};
use layout::{ForceLayout, LayoutOptions, Positions};
use semantic::{SemanticCache, SemanticExpansion, SemanticExtractor, SourceChain};

/// Everything a full pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    graph: Graph,
    positions: Positions,
    artifact: RenderArtifact,
    warnings: Vec<Warning>,
}

impl PipelineOutput {
    /// The parsed graph merged with its semantic expansion.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn artifact(&self) -> &RenderArtifact {
        &self.artifact
    }

    /// Non-fatal conditions from every stage, in pipeline order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_artifact(self) -> RenderArtifact {
        self.artifact
    }
}

/// Builder for turning text into rendered knowledge graphs.
///
/// The semantic cache is shared: builders created with
/// [`GraphBuilder::with_cache`] from the same `Arc` reuse each other's
/// source answers.
///
/// # Examples
///
/// ```rust,no_run
/// use lexigraph::{GraphBuilder, SourceType, config::AppConfig, export::RenderFormat};
///
/// let builder = GraphBuilder::new(AppConfig::default()).expect("valid config");
///
/// let output = builder
///     .run("Ideas is about cringe proof. It's a game about news.", SourceType::Markdown, RenderFormat::Svg)
///     .expect("Failed to build graph");
///
/// println!("{}", output.artifact().as_text().unwrap_or_default());
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: AppConfig,
    parser: ContentParser,
    extractor: SemanticExtractor,
    renderer: Renderer,
}

impl GraphBuilder {
    /// Create a builder with a private semantic cache.
    ///
    /// # Errors
    ///
    /// Returns [`LexigraphError::Config`] for invalid layout or render
    /// settings, or when an HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, LexigraphError> {
        config.validate()?;
        let cache = Arc::new(SemanticCache::new(config.semantic().cache_ttl()));
        Self::with_cache(config, cache)
    }

    /// Create a builder that stores source answers in `cache`.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::new`].
    pub fn with_cache(config: AppConfig, cache: Arc<SemanticCache>) -> Result<Self, LexigraphError> {
        config.validate()?;
        let chain = SourceChain::from_config(config.semantic())?;
        debug!(sources:? = chain.names(); "Semantic sources configured");

        Ok(Self {
            parser: ContentParser::new(config.parser().parser_config()),
            extractor: SemanticExtractor::new(chain, cache),
            renderer: Renderer::new(RenderStyle::from_config(config.render())?),
            config,
        })
    }

    /// Replace the semantic sources, keeping the cache.
    pub fn with_sources(mut self, chain: SourceChain) -> Self {
        self.extractor = SemanticExtractor::new(chain, Arc::clone(self.extractor.cache()));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<SemanticCache> {
        self.extractor.cache()
    }

    /// Parse text into a co-occurrence graph.
    ///
    /// Parsing never fails; a degraded parse carries a warning.
    pub fn parse(&self, text: &str, source_type: SourceType) -> Parsed {
        let parsed = self.parser.parse(text, source_type);
        trace!(graph:? = parsed.graph(); "Parsed graph");
        parsed
    }

    /// Parse raw bytes, degrading on invalid UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8], source_type: SourceType) -> Parsed {
        self.parser.parse_bytes(bytes, source_type)
    }

    /// Expand `graph` in place with semantic relationships.
    ///
    /// Does nothing when no source is enabled or `max_words` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`LexigraphError::Graph`] if `graph` is not closed.
    pub fn expand(&self, graph: &mut Graph) -> Result<SemanticExpansion, LexigraphError> {
        let max_words = self.config.semantic().max_words();
        if self.extractor.chain().is_empty() || max_words == 0 {
            debug!("Semantic expansion disabled");
            return Ok(SemanticExpansion::default());
        }
        Ok(self.extractor.expand(graph, max_words)?)
    }

    /// Compute node positions with the configured force layout.
    ///
    /// # Errors
    ///
    /// Returns [`LexigraphError::Layout`] for an invalid canvas or dangling
    /// edges.
    pub fn layout(&self, graph: &Graph) -> Result<Positions, LexigraphError> {
        let options = LayoutOptions::from_config(self.config.layout());
        Ok(ForceLayout::new(options).layout_graph(graph)?)
    }

    /// Render a laid-out graph.
    ///
    /// # Errors
    ///
    /// Returns [`LexigraphError::Render`] if a node has no position or the
    /// graph is not closed.
    pub fn render(
        &self,
        graph: &Graph,
        positions: &Positions,
        format: RenderFormat,
    ) -> Result<RenderArtifact, LexigraphError> {
        Ok(self.renderer.render(graph, positions, format)?)
    }

    /// Run the full pipeline on text.
    ///
    /// # Errors
    ///
    /// Returns the first hard error of the expand, layout or render stage.
    pub fn run(
        &self,
        text: &str,
        source_type: SourceType,
        format: RenderFormat,
    ) -> Result<PipelineOutput, LexigraphError> {
        let parsed = self.parse(text, source_type);
        self.finish(parsed, format)
    }

    /// Run the full pipeline on raw bytes.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::run`].
    pub fn run_bytes(
        &self,
        bytes: &[u8],
        source_type: SourceType,
        format: RenderFormat,
    ) -> Result<PipelineOutput, LexigraphError> {
        let parsed = self.parse_bytes(bytes, source_type);
        self.finish(parsed, format)
    }

    fn finish(&self, parsed: Parsed, format: RenderFormat) -> Result<PipelineOutput, LexigraphError> {
        let mut warnings = parsed.warnings().to_vec();
        let mut graph = parsed.into_graph();
        debug!(nodes = graph.node_count(), edges = graph.edge_count(); "Content parsed");

        let expansion = self.expand(&mut graph)?;
        warnings.extend(expansion.warnings());

        info!(nodes = graph.node_count(), edges = graph.edge_count(); "Laying out graph");
        let positions = self.layout(&graph)?;
        warnings.extend(positions.warning());

        let artifact = self.render(&graph, &positions, format)?;
        info!(
            format = format.as_str(),
            bytes = artifact.content().len(),
            warnings = warnings.len();
            "Pipeline finished"
        );

        Ok(PipelineOutput {
            graph,
            positions,
            artifact,
            warnings,
        })
    }
}
