//! Fruchterman-Reingold force-directed layout.
//!
//! Every pair of nodes repels with force `k²/d`, every edge pulls its
//! endpoints together with force `d - k`, and each step moves a node by at
//! most the current temperature. The temperature starts at a tenth of the
//! canvas width and cools linearly to zero over the iteration budget. The
//! simulation always runs the full budget.

use std::f64::consts::TAU;

use indexmap::IndexMap;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use lexigraph_core::{
    geometry::Point,
    graph::{Edge, Graph, Node},
};

use crate::layout::{LayoutError, LayoutOptions, Positions};

/// Distance below which two nodes count as coincident.
pub const EPSILON: f64 = 0.01;

/// Force layout engine.
///
/// # Examples
///
/// ```
/// # use lexigraph::layout::ForceLayout;
/// # use lexigraph_core::graph::{Edge, Node, RelationType};
/// let nodes = vec![Node::original("a", "a", 1.0), Node::original("b", "b", 1.0)];
/// let edges = vec![Edge::new("a", "b", 1.0, RelationType::CoOccurrence)];
///
/// let positions = ForceLayout::default()
///     .with_canvas(400.0, 300.0)
///     .with_seed(Some(7))
///     .run(&nodes, &edges)
///     .unwrap();
///
/// assert_eq!(positions.len(), 2);
/// assert!(positions.get("a").unwrap().is_within(400.0, 300.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ForceLayout {
    options: LayoutOptions,
}

impl ForceLayout {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.options.width = width;
        self.options.height = height;
        self
    }

    /// Set the number of simulation steps.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.options.iterations = iterations;
        self
    }

    /// Seed the random initial placement. `None` uses a fresh seed per run.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.options.seed = seed;
        self
    }

    /// Set the constant `C` in the ideal edge length `k = C·sqrt(area / n)`.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.options.spacing = spacing;
        self
    }

    /// Lays out the nodes and edges of `graph`.
    pub fn layout_graph(&self, graph: &Graph) -> Result<Positions, LayoutError> {
        let nodes: Vec<Node> = graph.nodes().cloned().collect();
        self.run(&nodes, graph.edges())
    }

    /// Computes one position per node.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidCanvas`] for a non-positive or
    /// non-finite canvas and [`LayoutError::UnknownNode`] for an edge whose
    /// endpoint is not in `nodes`.
    pub fn run(&self, nodes: &[Node], edges: &[Edge]) -> Result<Positions, LayoutError> {
        let LayoutOptions {
            width,
            height,
            iterations,
            seed,
            spacing,
        } = self.options;

        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(LayoutError::InvalidCanvas { width, height });
        }

        let index: IndexMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id(), i))
            .collect();
        let springs = resolve_edges(&index, edges)?;

        if nodes.is_empty() {
            return Ok(Positions::default());
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let n = index.len();
        let k = spacing * (width * height / n as f64).sqrt();
        let initial_temperature = width / 10.0;

        info!(
            nodes = n,
            edges = springs.len(),
            iterations = iterations,
            k = k;
            "Running force layout"
        );

        let mut positions: Vec<Point> = (0..n)
            .map(|_| {
                Point::new(
                    rng.random::<f64>() * width,
                    rng.random::<f64>() * height,
                )
            })
            .collect();
        let mut degenerate_resolutions = 0;

        for step in 0..iterations {
            let temperature = initial_temperature * (1.0 - step as f64 / iterations as f64);
            let mut displacement = vec![Point::default(); n];

            // Repulsion between every pair of nodes.
            for a in 0..n {
                for b in (a + 1)..n {
                    let mut delta = positions[a].sub_point(positions[b]);
                    let mut distance = delta.hypot();
                    if distance < EPSILON {
                        let angle = rng.random::<f64>() * TAU;
                        delta = Point::new(angle.cos(), angle.sin()).scale(EPSILON);
                        distance = EPSILON;
                        degenerate_resolutions += 1;
                    }

                    let push = delta.scale(k * k / (distance * distance));
                    displacement[a] = displacement[a].add_point(push);
                    displacement[b] = displacement[b].sub_point(push);
                }
            }

            // Attraction along edges.
            for &(source, target) in &springs {
                let delta = positions[source].sub_point(positions[target]);
                let distance = delta.hypot();
                if distance < EPSILON {
                    continue;
                }

                let pull = delta.scale((distance - k) / distance);
                displacement[source] = displacement[source].sub_point(pull);
                displacement[target] = displacement[target].add_point(pull);
            }

            for (position, shift) in positions.iter_mut().zip(&displacement) {
                let length = shift.hypot();
                if length > 0.0 && length.is_finite() {
                    let capped = shift.scale(length.min(temperature) / length);
                    *position = position.add_point(capped);
                }
                *position = position.clamp_to(width, height);
            }
        }

        if degenerate_resolutions > 0 {
            warn!(
                resolutions = degenerate_resolutions;
                "Coincident nodes were separated with random jitter"
            );
        }
        debug!(nodes = n; "Force layout finished");

        Ok(Positions::new(
            index
                .keys()
                .map(|id| id.to_string())
                .zip(positions)
                .collect(),
            degenerate_resolutions,
        ))
    }
}

/// Maps edges to index pairs, dropping self loops.
fn resolve_edges(
    index: &IndexMap<&str, usize>,
    edges: &[Edge],
) -> Result<Vec<(usize, usize)>, LayoutError> {
    let lookup = |edge: &Edge, id: &str| {
        index
            .get(id)
            .copied()
            .ok_or_else(|| LayoutError::UnknownNode {
                source_id: edge.source_id().to_string(),
                target_id: edge.target_id().to_string(),
                missing: id.to_string(),
            })
    };

    let mut springs = Vec::with_capacity(edges.len());
    for edge in edges {
        let source = lookup(edge, edge.source_id())?;
        let target = lookup(edge, edge.target_id())?;
        if source != target {
            springs.push((source, target));
        }
    }
    Ok(springs)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use lexigraph_core::graph::RelationType;

    use super::*;

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter().map(|id| Node::original(*id, *id, 1.0)).collect()
    }

    fn edge(a: &str, b: &str) -> Edge {
        Edge::new(a, b, 1.0, RelationType::CoOccurrence)
    }

    fn seeded(seed: u64) -> ForceLayout {
        ForceLayout::default().with_seed(Some(seed))
    }

    #[test]
    fn test_empty_input_gives_empty_positions() {
        let positions = seeded(1).run(&[], &[]).unwrap();
        assert!(positions.is_empty());
        assert_eq!(positions.degenerate_resolutions(), 0);
    }

    #[test]
    fn test_single_node_stays_in_bounds() {
        let positions = seeded(1)
            .with_canvas(100.0, 50.0)
            .run(&nodes(&["solo"]), &[])
            .unwrap();

        assert_eq!(positions.len(), 1);
        assert!(positions.get("solo").unwrap().is_within(100.0, 50.0));
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let nodes = nodes(&["a", "b", "c", "d"]);
        let edges = vec![edge("a", "b"), edge("b", "c"), edge("c", "a")];

        let first = seeded(42).run(&nodes, &edges).unwrap();
        let second = seeded(42).run(&nodes, &edges).unwrap();

        for (id, point) in first.iter() {
            let other = second.get(id).unwrap();
            assert_eq!(point.x().to_bits(), other.x().to_bits());
            assert_eq!(point.y().to_bits(), other.y().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let nodes = nodes(&["a", "b", "c"]);
        let first = seeded(1).run(&nodes, &[]).unwrap();
        let second = seeded(2).run(&nodes, &[]).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_connected_nodes_end_closer_than_unconnected() {
        let nodes = nodes(&["a", "b", "c"]);
        let positions = seeded(9)
            .with_spacing(0.2)
            .with_iterations(200)
            .run(&nodes, &[edge("a", "b")])
            .unwrap();

        let ab = positions.distance("a", "b").unwrap();
        let ac = positions.distance("a", "c").unwrap();
        let bc = positions.distance("b", "c").unwrap();
        assert!(ab < ac.max(bc), "ab={ab} ac={ac} bc={bc}");
    }

    #[test]
    fn test_zero_iterations_keeps_initial_placement() {
        let positions = seeded(3)
            .with_iterations(0)
            .run(&nodes(&["a", "b"]), &[edge("a", "b")])
            .unwrap();
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn test_dangling_edge_is_an_error() {
        let err = seeded(1)
            .run(&nodes(&["a"]), &[edge("a", "ghost")])
            .unwrap_err();

        assert_eq!(
            err,
            LayoutError::UnknownNode {
                source_id: "a".to_string(),
                target_id: "ghost".to_string(),
                missing: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_canvas_is_an_error() {
        for (width, height) in [(0.0, 10.0), (10.0, -1.0), (f64::NAN, 10.0), (f64::INFINITY, 5.0)] {
            let result = seeded(1)
                .with_canvas(width, height)
                .run(&nodes(&["a"]), &[]);
            assert!(matches!(result, Err(LayoutError::InvalidCanvas { .. })));
        }
    }

    #[test]
    fn test_coincident_nodes_are_resolved() {
        // Every pair on a canvas this small starts closer than EPSILON.
        let size = EPSILON / 10.0;
        let positions = seeded(5)
            .with_canvas(size, size)
            .with_iterations(5)
            .run(&nodes(&["a", "b", "c"]), &[])
            .unwrap();

        assert_eq!(positions.len(), 3);
        assert!(positions.degenerate_resolutions() >= 3);
        assert!(positions.warning().is_some());
        for (_, point) in positions.iter() {
            assert!(point.is_within(size, size));
        }
    }

    #[test]
    fn test_self_loops_are_ignored() {
        let positions = seeded(1)
            .run(&nodes(&["a", "b"]), &[edge("a", "a")])
            .unwrap();
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn test_ideal_length_scales_with_spacing() {
        let layout = ForceLayout::default().with_spacing(2.0);
        assert_approx_eq!(f64, layout.options().spacing, 2.0);
    }
}
