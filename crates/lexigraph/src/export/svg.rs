//! SVG rendering.
//!
//! The document is drawn in three layers: edges (`<line>`), nodes
//! (`<circle>`, radius scaled by weight) and labels (`<text>`). Elements refer
//! to nodes by their index in graph order (`data-node`, `data-source`,
//! `data-target`) so the HTML page script can find neighbours. Node ids and
//! labels only appear as escaped text content.

use log::debug;
use svg::{
    Document,
    node::element::{Circle, Group, Line, Rectangle, Text},
};

use lexigraph_core::graph::{Node, Origin};

use super::{Exporter, RenderError, RenderFormat, RenderStyle, Scene};

pub const MIN_RADIUS: f64 = 6.0;
pub const MAX_RADIUS: f64 = 24.0;

/// Space around the canvas so border nodes and their labels stay visible.
const MARGIN: f64 = 40.0;

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";
const FONT_SIZE: f64 = 12.0;

pub struct SvgExporter<'a> {
    style: &'a RenderStyle,
}

impl<'a> SvgExporter<'a> {
    pub fn new(style: &'a RenderStyle) -> Self {
        Self { style }
    }

    /// Builds the SVG document for `scene`.
    pub fn document(&self, scene: &Scene<'_>) -> Document {
        let (min, max) = scene.bounds().unwrap_or_default();
        let width = max.x().max(0.0) + 2.0 * MARGIN;
        let height = max.y().max(0.0) + 2.0 * MARGIN;
        let origin_x = min.x().min(0.0) - MARGIN;
        let origin_y = min.y().min(0.0) - MARGIN;

        let mut doc = Document::new()
            .set("viewBox", format!("{origin_x} {origin_y} {width} {height}"))
            .set("width", width)
            .set("height", height)
            .set("class", "lexigraph");

        if let Some(background) = self.style.background_color() {
            doc = doc.add(
                Rectangle::new()
                    .set("x", origin_x)
                    .set("y", origin_y)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", &background)
                    .set("fill-opacity", background.alpha()),
            );
        }

        doc.add(self.edge_layer(scene))
            .add(self.node_layer(scene))
            .add(self.label_layer(scene))
    }

    fn edge_layer(&self, scene: &Scene<'_>) -> Group {
        let edge_color = self.style.edge_color();
        let mut group = Group::new()
            .set("class", "edges")
            .set("stroke", &edge_color)
            .set("stroke-opacity", edge_color.alpha());

        for (edge, source, target) in scene.edges() {
            let (Some(source_index), Some(target_index)) = (
                scene.node_index(edge.source_id()),
                scene.node_index(edge.target_id()),
            ) else {
                continue;
            };
            let line = Line::new()
                .set("x1", source.x())
                .set("y1", source.y())
                .set("x2", target.x())
                .set("y2", target.y())
                .set("stroke-width", stroke_width(edge.weight()))
                .set("data-source", source_index.to_string())
                .set("data-target", target_index.to_string())
                .set("data-relation", edge.relation_type().as_str())
                .set("data-weight", edge.weight());
            group = group.add(line);
        }
        group
    }

    fn node_layer(&self, scene: &Scene<'_>) -> Group {
        let (min_weight, max_weight) = scene.weight_range().unwrap_or((1.0, 1.0));
        let mut group = Group::new().set("class", "nodes");

        for (index, (node, point)) in scene.nodes().enumerate() {
            let fill = match node.origin() {
                Origin::Original => self.style.original_color(),
                Origin::Semantic => self.style.semantic_color(),
            };
            let circle = Circle::new()
                .set("id", format!("node-{index}"))
                .set("cx", point.x())
                .set("cy", point.y())
                .set("r", radius(node, min_weight, max_weight))
                .set("fill", &fill)
                .set("fill-opacity", fill.alpha())
                .set("stroke", "white")
                .set("stroke-width", 1.5)
                .set("data-node", index.to_string())
                .set("data-origin", node.origin().as_str())
                .set("data-weight", node.weight());
            group = group.add(circle);
        }
        group
    }

    fn label_layer(&self, scene: &Scene<'_>) -> Group {
        let (min_weight, max_weight) = scene.weight_range().unwrap_or((1.0, 1.0));
        let mut group = Group::new()
            .set("class", "labels")
            .set("font-family", FONT_FAMILY)
            .set("font-size", FONT_SIZE)
            .set("text-anchor", "middle")
            .set("pointer-events", "none");

        for (index, (node, point)) in scene.nodes().enumerate() {
            let offset = radius(node, min_weight, max_weight) + FONT_SIZE;
            let text = Text::new(node.label())
                .set("x", point.x())
                .set("y", point.y() + offset)
                .set("data-node", index.to_string());
            group = group.add(text);
        }
        group
    }
}

/// Circle radius interpolated between [`MIN_RADIUS`] and [`MAX_RADIUS`].
pub fn radius(node: &Node, min_weight: f64, max_weight: f64) -> f64 {
    let span = max_weight - min_weight;
    if span <= f64::EPSILON {
        return (MIN_RADIUS + MAX_RADIUS) / 2.0;
    }
    let t = ((node.weight() - min_weight) / span).clamp(0.0, 1.0);
    MIN_RADIUS + t * (MAX_RADIUS - MIN_RADIUS)
}

fn stroke_width(weight: f64) -> f64 {
    1.0 + weight.clamp(0.0, 4.0) * 0.5
}

impl Exporter for SvgExporter<'_> {
    fn format(&self) -> RenderFormat {
        RenderFormat::Svg
    }

    fn export(&self, scene: &Scene<'_>) -> Result<Vec<u8>, RenderError> {
        let doc = self.document(scene);
        debug!("SVG document rendered");
        Ok(doc.to_string().into_bytes())
    }
}
