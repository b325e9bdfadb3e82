//! Graph construction from a filtered token stream.

use indexmap::IndexMap;

use lexigraph_core::graph::{Edge, Graph, Node, RelationType};

/// A token ready for graph construction: normalized id plus the surface form
/// it was first seen with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub id: String,
    pub surface: String,
}

struct PairCount {
    source: String,
    target: String,
    count: usize,
}

/// Builds the word-frequency nodes for `tokens`, in first-occurrence order.
fn frequency_nodes(tokens: &[Token]) -> IndexMap<String, (String, usize)> {
    let mut counts: IndexMap<String, (String, usize)> = IndexMap::new();
    for token in tokens {
        counts
            .entry(token.id.clone())
            .or_insert_with(|| (token.surface.clone(), 0))
            .1 += 1;
    }
    counts
}

fn insert_nodes(graph: &mut Graph, counts: IndexMap<String, (String, usize)>) {
    for (id, (label, count)) in counts {
        graph.add_node(Node::original(id, label, count as f64));
    }
}

/// Builds a frequency-only graph: one node per distinct token, no edges.
pub(crate) fn frequency_graph(tokens: &[Token]) -> Graph {
    let mut graph = Graph::new();
    insert_nodes(&mut graph, frequency_nodes(tokens));
    graph
}

/// Builds the full co-occurrence graph.
///
/// Every pair of distinct tokens less than `window_size` positions apart
/// contributes one co-occurrence to the (unordered) pair. The stored edge
/// direction is the order in which the pair was first observed.
pub(crate) fn co_occurrence_graph(tokens: &[Token], window_size: usize) -> Graph {
    let mut graph = frequency_graph(tokens);

    let mut pairs: IndexMap<(String, String), PairCount> = IndexMap::new();
    for (i, left) in tokens.iter().enumerate() {
        let window_end = (i + window_size).min(tokens.len());
        for right in tokens.iter().take(window_end).skip(i + 1) {
            if left.id == right.id {
                continue;
            }
            let key = if left.id < right.id {
                (left.id.clone(), right.id.clone())
            } else {
                (right.id.clone(), left.id.clone())
            };
            pairs
                .entry(key)
                .or_insert_with(|| PairCount {
                    source: left.id.clone(),
                    target: right.id.clone(),
                    count: 0,
                })
                .count += 1;
        }
    }

    for pair in pairs.into_values() {
        let edge = Edge::new(
            pair.source,
            pair.target,
            pair.count as f64,
            RelationType::CoOccurrence,
        );
        // Endpoints come from the same token stream as the nodes.
        if let Err(err) = graph.add_edge(edge) {
            log::error!(err:? = err; "Co-occurrence edge rejected");
        }
    }

    graph
}
