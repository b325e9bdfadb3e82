//! JSON rendering.
//!
//! Output shape:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "game", "label": "Game", "x": 1.0, "y": 2.0, "weight": 3.0, "origin": "original" }],
//!   "edges": [{ "source": "game", "target": "activity", "weight": 1.0, "relation_type": "is_a" }]
//! }
//! ```
//!
//! Nodes and edges keep graph order, so rendering the same scene twice yields
//! identical bytes.

use serde::Serialize;

use lexigraph_core::graph::{Origin, RelationType};

use super::{Exporter, RenderError, RenderFormat, Scene};

#[derive(Debug, Serialize)]
pub(crate) struct GraphData<'a> {
    nodes: Vec<NodeData<'a>>,
    edges: Vec<EdgeData<'a>>,
}

#[derive(Debug, Serialize)]
struct NodeData<'a> {
    id: &'a str,
    label: &'a str,
    x: f64,
    y: f64,
    weight: f64,
    origin: Origin,
}

#[derive(Debug, Serialize)]
struct EdgeData<'a> {
    source: &'a str,
    target: &'a str,
    weight: f64,
    relation_type: RelationType,
}

impl<'a> GraphData<'a> {
    pub(crate) fn from_scene(scene: &Scene<'a>) -> Self {
        let nodes = scene
            .nodes()
            .map(|(node, point)| NodeData {
                id: node.id(),
                label: node.label(),
                x: point.x(),
                y: point.y(),
                weight: node.weight(),
                origin: node.origin(),
            })
            .collect();
        let edges = scene
            .edges()
            .map(|(edge, _, _)| EdgeData {
                source: edge.source_id(),
                target: edge.target_id(),
                weight: edge.weight(),
                relation_type: edge.relation_type(),
            })
            .collect();
        Self { nodes, edges }
    }
}

/// Pretty-printed JSON exporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> RenderFormat {
        RenderFormat::Json
    }

    fn export(&self, scene: &Scene<'_>) -> Result<Vec<u8>, RenderError> {
        Ok(serde_json::to_vec_pretty(&GraphData::from_scene(scene))?)
    }
}
