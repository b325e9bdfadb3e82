//! Spatial layout of knowledge graphs.
//!
//! The only engine is the Fruchterman-Reingold simulation in [`ForceLayout`].
//! It produces [`Positions`]: exactly one point per node inside the canvas.

mod force;

pub use force::{EPSILON, ForceLayout};

use indexmap::IndexMap;
use thiserror::Error;

use crate::config::LayoutConfig;

use lexigraph_core::{
    geometry::Point,
    graph::{Edge, Node},
    warning::Warning,
};

/// Errors that prevent a layout from being computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("edge {source_id} -> {target_id} references unknown node `{missing}`")]
    UnknownNode {
        source_id: String,
        target_id: String,
        missing: String,
    },

    #[error("invalid canvas {width}x{height}: dimensions must be positive and finite")]
    InvalidCanvas { width: f64, height: f64 },
}

/// Parameters of a force layout run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) iterations: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) spacing: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            iterations: 100,
            seed: None,
            spacing: 1.0,
        }
    }
}

impl LayoutOptions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Canvas, iteration budget and seed from configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.width(), config.height())
            .with_iterations(config.iterations())
            .with_seed(config.seed())
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Node positions produced by a layout run, in node order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Positions {
    points: IndexMap<String, Point>,
    degenerate_resolutions: usize,
}

impl Positions {
    pub fn new(points: IndexMap<String, Point>, degenerate_resolutions: usize) -> Self {
        Self {
            points,
            degenerate_resolutions,
        }
    }

    pub fn get(&self, node_id: &str) -> Option<Point> {
        self.points.get(node_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.points.iter().map(|(id, point)| (id.as_str(), *point))
    }

    /// Euclidean distance between two positioned nodes.
    pub fn distance(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.get(a)?.sub_point(self.get(b)?).hypot())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// How many times coincident nodes had to be pushed apart at random.
    pub fn degenerate_resolutions(&self) -> usize {
        self.degenerate_resolutions
    }

    /// A [`Warning::LayoutDegenerate`] if any coincidence was resolved.
    pub fn warning(&self) -> Option<Warning> {
        (self.degenerate_resolutions > 0).then_some(Warning::LayoutDegenerate {
            resolutions: self.degenerate_resolutions,
        })
    }
}

/// Runs a force layout with `options`.
///
/// # Errors
///
/// See [`ForceLayout::run`].
pub fn layout(
    nodes: &[Node],
    edges: &[Edge],
    options: LayoutOptions,
) -> Result<Positions, LayoutError> {
    ForceLayout::new(options).run(nodes, edges)
}
