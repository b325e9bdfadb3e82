//! Knowledge graph model.
//!
//! A [`Graph`] is an insertion-ordered set of [`Node`]s keyed by their
//! normalized id plus a list of typed, weighted [`Edge`]s. The graph enforces
//! its closure invariant on every mutation: an edge can only be added when
//! both of its endpoints already exist, so a graph built through this API
//! never contains a dangling edge.
//!
//! # Examples
//!
//! ```
//! # use lexigraph_core::graph::{Edge, Graph, Node, RelationType};
//! let mut graph = Graph::new();
//! graph.add_node(Node::original("game", "game", 2.0));
//! graph.add_node(Node::semantic("activity"));
//! graph
//!     .add_edge(Edge::new("game", "activity", 1.0, RelationType::IsA))
//!     .unwrap();
//!
//! assert_eq!(graph.node_count(), 2);
//! assert!(graph.add_edge(Edge::new("game", "missing", 1.0, RelationType::IsA)).is_err());
//! ```

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weight assigned to nodes introduced by semantic expansion.
pub const SEMANTIC_NODE_WEIGHT: f64 = 1.0;

/// Errors raised when a graph would violate its structural invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("edge `{source_id}` -> `{target_id}` references unknown node `{missing}`")]
    DanglingEdge {
        source_id: String,
        target_id: String,
        missing: String,
    },

    #[error("node id `{0}` appears more than once")]
    DuplicateNode(String),

    #[error("edge `{source_id}` -> `{target_id}` has invalid weight {weight}")]
    InvalidWeight {
        source_id: String,
        target_id: String,
        weight: f64,
    },
}

/// Where a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// A word found in the source text.
    Original,
    /// A term introduced by a semantic source.
    Semantic,
}

impl Origin {
    /// Returns the wire name of this origin.
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Original => "original",
            Origin::Semantic => "semantic",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of relationship an edge expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// Both words appeared within the same window of source text.
    CoOccurrence,
    /// Hypernym: the source is a kind of the target.
    IsA,
    /// The source has the target as a part or property.
    HasAttribute,
    /// The source is used for the target.
    UsedFor,
    /// Loosely related terms, including synonyms.
    RelatedTo,
}

impl RelationType {
    /// The four semantic relation buckets, in canonical order.
    pub const SEMANTIC: [RelationType; 4] = [
        RelationType::IsA,
        RelationType::HasAttribute,
        RelationType::UsedFor,
        RelationType::RelatedTo,
    ];

    /// Returns the wire name of this relation type.
    pub fn as_str(self) -> &'static str {
        match self {
            RelationType::CoOccurrence => "co_occurrence",
            RelationType::IsA => "is_a",
            RelationType::HasAttribute => "has_attribute",
            RelationType::UsedFor => "used_for",
            RelationType::RelatedTo => "related_to",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "co_occurrence" => Ok(RelationType::CoOccurrence),
            "is_a" => Ok(RelationType::IsA),
            "has_attribute" => Ok(RelationType::HasAttribute),
            "used_for" => Ok(RelationType::UsedFor),
            "related_to" => Ok(RelationType::RelatedTo),
            other => Err(format!("unknown relation type `{other}`")),
        }
    }
}

/// Normalizes a word or phrase into a node id.
///
/// Lowercases, trims surrounding punctuation and collapses inner whitespace.
///
/// # Examples
///
/// ```
/// # use lexigraph_core::graph::normalize_term;
/// assert_eq!(normalize_term("  Board   Game. "), "board game");
/// ```
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Collapses whitespace and drops control characters from a display label.
///
/// Unlike [`normalize_term`] the case and punctuation are kept.
///
/// # Examples
///
/// ```
/// # use lexigraph_core::graph::clean_label;
/// assert_eq!(clean_label(" Board\n  Game\u{7} "), "Board Game");
/// ```
pub fn clean_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(|part| part.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A vertex of the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: String,
    label: String,
    weight: f64,
    origin: Origin,
}

impl Node {
    /// Creates a node for a word taken from the source text.
    pub fn original(id: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            label: clean_label(&label.into()),
            weight,
            origin: Origin::Original,
        }
    }

    /// Creates a node for a term introduced by semantic expansion.
    ///
    /// The id is the normalized term and the weight is [`SEMANTIC_NODE_WEIGHT`].
    pub fn semantic(term: &str) -> Self {
        Self {
            id: normalize_term(term),
            label: clean_label(term),
            weight: SEMANTIC_NODE_WEIGHT,
            origin: Origin::Semantic,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

/// A weighted, typed relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    source_id: String,
    target_id: String,
    weight: f64,
    relation_type: RelationType,
}

impl Edge {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        weight: f64,
        relation_type: RelationType,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            weight,
            relation_type,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn relation_type(&self) -> RelationType {
        self.relation_type
    }
}

/// A knowledge graph with unique node ids and closure-checked edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from raw parts, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] for duplicate node ids, dangling edges or
    /// invalid edge weights.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for node in nodes {
            let id = node.id.clone();
            if !graph.add_node(node) {
                return Err(GraphError::DuplicateNode(id));
            }
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Inserts a node. Returns `false` (leaving the graph untouched) if a node
    /// with the same id already exists.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        trace!(node_id = node.id.as_str(), origin = node.origin.as_str(); "Adding node");
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Appends an edge after checking its endpoints and weight.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingEdge`] if either endpoint is missing and
    /// [`GraphError::InvalidWeight`] for negative or non-finite weights.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        self.check_edge(&edge)?;
        self.edges.push(edge);
        Ok(())
    }

    fn check_edge(&self, edge: &Edge) -> Result<(), GraphError> {
        for endpoint in [&edge.source_id, &edge.target_id] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::DanglingEdge {
                    source_id: edge.source_id.clone(),
                    target_id: edge.target_id.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                source_id: edge.source_id.clone(),
                target_id: edge.target_id.clone(),
                weight: edge.weight,
            });
        }
        Ok(())
    }

    /// Re-checks the closure invariant and edge weights.
    pub fn validate(&self) -> Result<(), GraphError> {
        self.edges.iter().try_for_each(|edge| self.check_edge(edge))
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns `true` if an edge with these endpoints and type exists.
    pub fn has_edge(&self, source_id: &str, target_id: &str, relation_type: RelationType) -> bool {
        self.edges.iter().any(|edge| {
            edge.source_id == source_id
                && edge.target_id == target_id
                && edge.relation_type == relation_type
        })
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the position of a node in insertion order.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Returns ids of nodes sharing an edge with `id`, in edge order, without repeats.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let mut neighbors: Vec<&str> = Vec::new();
        for edge in &self.edges {
            let other = if edge.source_id == id {
                edge.target_id.as_str()
            } else if edge.target_id == id {
                edge.source_id.as_str()
            } else {
                continue;
            };
            if other != id && !neighbors.contains(&other) {
                neighbors.push(other);
            }
        }
        neighbors
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Merges new nodes and edges into this graph.
    ///
    /// Nodes whose id already exists are skipped; edges are added only after
    /// all nodes are in place, so edges between new nodes are accepted.
    ///
    /// # Errors
    ///
    /// Returns the first [`GraphError`] raised by an edge. Nodes inserted
    /// before the failing edge remain in the graph.
    pub fn merge(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> Result<(), GraphError> {
        for node in nodes {
            self.add_node(node);
        }
        for edge in edges {
            self.add_edge(edge)?;
        }
        Ok(())
    }

    /// Splits the graph into its nodes (insertion order) and edges.
    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes.into_values().collect(), self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(Node::original("ideas", "ideas", 1.0));
        graph.add_node(Node::original("cringe", "cringe", 1.0));
        graph.add_node(Node::original("proof", "proof", 1.0));
        graph
            .add_edge(Edge::new("ideas", "cringe", 1.0, RelationType::CoOccurrence))
            .unwrap();
        graph
            .add_edge(Edge::new("cringe", "proof", 2.0, RelationType::CoOccurrence))
            .unwrap();
        graph
    }

    #[test]
    fn test_add_node_rejects_duplicates() {
        let mut graph = Graph::new();
        assert!(graph.add_node(Node::original("game", "game", 1.0)));
        assert!(!graph.add_node(Node::semantic("game")));
        assert_eq!(graph.node("game").unwrap().origin(), Origin::Original);
    }

    #[test]
    fn test_dangling_edge_is_rejected() {
        let mut graph = sample_graph();
        let err = graph
            .add_edge(Edge::new("ideas", "news", 1.0, RelationType::CoOccurrence))
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingEdge {
                source_id: "ideas".to_string(),
                target_id: "news".to_string(),
                missing: "news".to_string(),
            }
        );
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let mut graph = sample_graph();
        let result = graph.add_edge(Edge::new("ideas", "proof", -1.0, RelationType::RelatedTo));
        assert!(matches!(result, Err(GraphError::InvalidWeight { .. })));
    }

    #[test]
    fn test_from_parts_rejects_duplicate_ids() {
        let nodes = vec![
            Node::original("a", "a", 1.0),
            Node::original("a", "A", 2.0),
        ];
        let result = Graph::from_parts(nodes, Vec::new());
        assert_eq!(result, Err(GraphError::DuplicateNode("a".to_string())));
    }

    #[test]
    fn test_from_parts_rejects_dangling_edges() {
        let nodes = vec![Node::original("a", "a", 1.0)];
        let edges = vec![Edge::new("a", "b", 1.0, RelationType::IsA)];
        assert!(matches!(
            Graph::from_parts(nodes, edges),
            Err(GraphError::DanglingEdge { .. })
        ));
    }

    #[test]
    fn test_neighbors_are_unique_and_ordered() {
        let mut graph = sample_graph();
        graph
            .add_edge(Edge::new("proof", "cringe", 1.0, RelationType::RelatedTo))
            .unwrap();
        assert_eq!(graph.neighbors("cringe"), vec!["ideas", "proof"]);
        assert_eq!(graph.neighbors("ideas"), vec!["cringe"]);
    }

    #[test]
    fn test_merge_accepts_edges_between_new_nodes() {
        let mut graph = sample_graph();
        graph
            .merge(
                vec![Node::semantic("idea"), Node::semantic("Concept")],
                vec![
                    Edge::new("ideas", "idea", 1.0, RelationType::RelatedTo),
                    Edge::new("idea", "concept", 1.0, RelationType::IsA),
                ],
            )
            .unwrap();
        assert_eq!(graph.node_count(), 5);
        assert!(graph.has_edge("idea", "concept", RelationType::IsA));
        assert_eq!(graph.node("concept").unwrap().label(), "Concept");
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_node_order_is_insertion_order() {
        let graph = sample_graph();
        let ids: Vec<&str> = graph.nodes().map(Node::id).collect();
        assert_eq!(ids, vec!["ideas", "cringe", "proof"]);
        assert_eq!(graph.node_index("proof"), Some(2));
        assert_eq!(graph.node_index("missing"), None);
    }

    #[test]
    fn test_relation_type_round_trips_through_str() {
        for relation in RelationType::SEMANTIC {
            assert_eq!(relation.as_str().parse::<RelationType>(), Ok(relation));
        }
        assert!("part_of".parse::<RelationType>().is_err());
    }

    #[test]
    fn test_normalize_term() {
        assert_eq!(normalize_term("Activity"), "activity");
        assert_eq!(normalize_term("\"video  game\""), "video game");
        assert_eq!(normalize_term("..."), "");
    }

    #[test]
    fn test_semantic_labels_are_single_line() {
        let node = Node::semantic("  Board\n\tGame\r\n");
        assert_eq!(node.id(), "board game");
        assert_eq!(node.label(), "Board Game");

        let node = Node::semantic("bell\u{7}");
        assert_eq!(node.label(), "bell");
    }
}
