//! Rendering of laid-out graphs into output artifacts.
//!
//! Four formats are supported, each implemented by an [`Exporter`]:
//!
//! - `svg` - circles, lines and labels ([`svg::SvgExporter`])
//! - `html` - a self-contained page embedding the SVG and the JSON data
//!   ([`html::HtmlExporter`])
//! - `json` - nodes with positions and edges ([`json::JsonExporter`])
//! - `ascii` - a lossy character grid ([`ascii::AsciiExporter`])
//!
//! Rendering happens entirely in memory. Either a complete
//! [`RenderArtifact`] is returned or an error; callers never see partial
//! output.

pub mod ascii;
pub mod html;
pub mod json;
pub mod svg;

use std::{fmt, str::FromStr};

use log::{debug, info};
use thiserror::Error;

use lexigraph_core::{
    color::Color,
    geometry::Point,
    graph::{Edge, Graph, GraphError, Node},
};

use crate::{
    config::{ConfigError, RenderConfig},
    layout::Positions,
};

/// Errors raised while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format `{0}` (expected html, svg, json or ascii)")]
    UnsupportedFormat(String),

    #[error("node `{0}` has no layout position")]
    MissingPosition(String),

    #[error("graph is inconsistent: {0}")]
    Graph(#[from] GraphError),

    #[error("failed to serialize graph: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderFormat {
    Html,
    Svg,
    Json,
    Ascii,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 4] = [
        RenderFormat::Html,
        RenderFormat::Svg,
        RenderFormat::Json,
        RenderFormat::Ascii,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RenderFormat::Html => "html",
            RenderFormat::Svg => "svg",
            RenderFormat::Json => "json",
            RenderFormat::Ascii => "ascii",
        }
    }

    /// Conventional file extension for artifacts of this format.
    pub fn extension(self) -> &'static str {
        match self {
            RenderFormat::Ascii => "txt",
            other => other.as_str(),
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            RenderFormat::Html => "text/html; charset=utf-8",
            RenderFormat::Svg => "image/svg+xml",
            RenderFormat::Json => "application/json",
            RenderFormat::Ascii => "text/plain; charset=utf-8",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| RenderError::UnsupportedFormat(s.to_string()))
    }
}

/// A rendered graph: format tag plus the complete output bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderArtifact {
    format: RenderFormat,
    content: Vec<u8>,
}

impl RenderArtifact {
    pub fn new(format: RenderFormat, content: Vec<u8>) -> Self {
        Self { format, content }
    }

    pub fn format(&self) -> RenderFormat {
        self.format
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The content as text. Every built-in format produces UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

/// Colours and grid size shared by the exporters.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    original_color: Color,
    semantic_color: Color,
    edge_color: Color,
    background_color: Option<Color>,
    ascii_columns: usize,
    ascii_rows: usize,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            original_color: Color::new("#4a90d9").unwrap_or_default(),
            semantic_color: Color::new("#e8a33d").unwrap_or_default(),
            edge_color: Color::new("#9aa5b1").unwrap_or_default(),
            background_color: None,
            ascii_columns: 80,
            ascii_rows: 24,
        }
    }
}

impl RenderStyle {
    /// Builds a style from configuration, validating every colour.
    pub fn from_config(config: &RenderConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            original_color: config.original_color()?,
            semantic_color: config.semantic_color()?,
            edge_color: config.edge_color()?,
            background_color: config.background_color()?,
            ascii_columns: config.ascii_columns().max(1),
            ascii_rows: config.ascii_rows().max(1),
        })
    }

    pub fn with_ascii_grid(mut self, columns: usize, rows: usize) -> Self {
        self.ascii_columns = columns.max(1);
        self.ascii_rows = rows.max(1);
        self
    }

    pub fn original_color(&self) -> Color {
        self.original_color
    }

    pub fn semantic_color(&self) -> Color {
        self.semantic_color
    }

    pub fn edge_color(&self) -> Color {
        self.edge_color
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn ascii_columns(&self) -> usize {
        self.ascii_columns
    }

    pub fn ascii_rows(&self) -> usize {
        self.ascii_rows
    }
}

/// A graph whose nodes all have positions.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    graph: &'a Graph,
    positions: &'a Positions,
}

impl<'a> Scene<'a> {
    /// Checks that the graph is closed and that every node is positioned.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Graph`] for dangling edges and
    /// [`RenderError::MissingPosition`] for unpositioned nodes.
    pub fn new(graph: &'a Graph, positions: &'a Positions) -> Result<Self, RenderError> {
        graph.validate()?;
        if let Some(node) = graph.nodes().find(|node| positions.get(node.id()).is_none()) {
            return Err(RenderError::MissingPosition(node.id().to_string()));
        }
        Ok(Self { graph, positions })
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Nodes with their positions, in graph order.
    pub fn nodes(&self) -> impl Iterator<Item = (&'a Node, Point)> + '_ {
        self.graph
            .nodes()
            .filter_map(|node| Some((node, self.positions.get(node.id())?)))
    }

    /// Edges with their endpoint positions, in graph order.
    pub fn edges(&self) -> impl Iterator<Item = (&'a Edge, Point, Point)> + '_ {
        self.graph.edges().iter().filter_map(|edge| {
            let source = self.positions.get(edge.source_id())?;
            let target = self.positions.get(edge.target_id())?;
            Some((edge, source, target))
        })
    }

    /// Position of a node in graph order.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.graph.node_index(id)
    }

    /// Smallest and largest node weight, `None` for an empty graph.
    pub fn weight_range(&self) -> Option<(f64, f64)> {
        self.graph.nodes().map(Node::weight).fold(None, |range, w| {
            Some(match range {
                None => (w, w),
                Some((min, max)) => (f64::min(min, w), f64::max(max, w)),
            })
        })
    }

    /// Bounding box of all positions as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        self.nodes().map(|(_, point)| point).fold(None, |bounds, p| {
            Some(match bounds {
                None => (p, p),
                Some((min, max)) => (
                    Point::new(min.x().min(p.x()), min.y().min(p.y())),
                    Point::new(max.x().max(p.x()), max.y().max(p.y())),
                ),
            })
        })
    }
}

/// A renderer for one output format.
pub trait Exporter {
    fn format(&self) -> RenderFormat;

    /// Renders the complete scene.
    fn export(&self, scene: &Scene<'_>) -> Result<Vec<u8>, RenderError>;
}

/// Renders graphs in any [`RenderFormat`] with one [`RenderStyle`].
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Renders `graph` at `positions` as `format`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the graph has dangling edges, a node has no
    /// position, or serialization fails.
    pub fn render(
        &self,
        graph: &Graph,
        positions: &Positions,
        format: RenderFormat,
    ) -> Result<RenderArtifact, RenderError> {
        let scene = Scene::new(graph, positions)?;
        info!(format = format.as_str(), nodes = graph.node_count(); "Rendering graph");

        let content = match format {
            RenderFormat::Svg => svg::SvgExporter::new(&self.style).export(&scene)?,
            RenderFormat::Html => html::HtmlExporter::new(&self.style).export(&scene)?,
            RenderFormat::Json => json::JsonExporter.export(&scene)?,
            RenderFormat::Ascii => ascii::AsciiExporter::new(&self.style).export(&scene)?,
        };

        debug!(format = format.as_str(), bytes = content.len(); "Graph rendered");
        Ok(RenderArtifact::new(format, content))
    }
}

/// Renders with the default [`RenderStyle`].
pub fn render(
    graph: &Graph,
    positions: &Positions,
    format: RenderFormat,
) -> Result<RenderArtifact, RenderError> {
    Renderer::default().render(graph, positions, format)
}

#[cfg(test)]
pub(crate) mod test_support {
    use indexmap::IndexMap;

    use lexigraph_core::graph::RelationType;

    use super::*;

    /// Three nodes (one semantic) and two edges at fixed positions.
    pub fn triangle() -> (Graph, Positions) {
        let graph = Graph::from_parts(
            vec![
                Node::original("game", "Game", 3.0),
                Node::original("news", "news", 1.0),
                Node::semantic("activity"),
            ],
            vec![
                Edge::new("game", "news", 2.0, RelationType::CoOccurrence),
                Edge::new("game", "activity", 1.0, RelationType::IsA),
            ],
        )
        .unwrap();

        let points: IndexMap<String, Point> = [
            ("game", Point::new(100.0, 100.0)),
            ("news", Point::new(700.0, 500.0)),
            ("activity", Point::new(1100.0, 100.0)),
        ]
        .into_iter()
        .map(|(id, point)| (id.to_string(), point))
        .collect();

        (graph, Positions::new(points, 0))
    }
}
