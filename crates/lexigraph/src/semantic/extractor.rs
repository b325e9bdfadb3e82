//! Semantic expansion of the heaviest words of a graph.

use std::{
    cmp::Ordering,
    collections::HashSet,
    sync::Arc,
};

use log::{debug, info};

use lexigraph_core::{
    graph::{Edge, Graph, GraphError, Node, normalize_term},
    relationship::RelationshipSet,
    warning::Warning,
};

use crate::semantic::{
    cache::SemanticCache,
    source::{SemanticSource, SourceChain},
};

/// Weight of every edge added by semantic expansion.
pub const SEMANTIC_EDGE_WEIGHT: f64 = 1.0;

/// Nodes and edges produced by one expansion run.
///
/// Edges reference either the input nodes or the new semantic nodes, so
/// merging an expansion into the graph it came from keeps the graph closed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticExpansion {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    expanded: Vec<(String, String)>,
    skipped: Vec<String>,
}

impl SemanticExpansion {
    /// New semantic nodes, in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// `(word, source_name)` for every word that was expanded.
    pub fn expanded(&self) -> &[(String, String)] {
        &self.expanded
    }

    /// Words no source could expand.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// One [`Warning::ExtractionSkipped`] per skipped word.
    pub fn warnings(&self) -> Vec<Warning> {
        self.skipped
            .iter()
            .map(|word| Warning::ExtractionSkipped { word: word.clone() })
            .collect()
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

/// Expands words through a [`SourceChain`], caching every source answer.
#[derive(Debug, Clone)]
pub struct SemanticExtractor {
    chain: SourceChain,
    cache: Arc<SemanticCache>,
}

impl SemanticExtractor {
    pub fn new(chain: SourceChain, cache: Arc<SemanticCache>) -> Self {
        Self { chain, cache }
    }

    pub fn chain(&self) -> &SourceChain {
        &self.chain
    }

    pub fn cache(&self) -> &Arc<SemanticCache> {
        &self.cache
    }

    /// Asks the sources about `word` in priority order and returns the first
    /// non-empty answer with the name of the source that gave it.
    ///
    /// Answers are never merged across sources.
    pub fn relationships_for(&self, word: &str) -> Option<(String, RelationshipSet)> {
        for source in self.chain.iter() {
            let name = source.name();
            match self
                .cache
                .get_or_fetch(word, name, || source.query(word))
            {
                Ok(set) if !set.is_empty() => {
                    debug!(word = word, source = name, relationships = set.len(); "Word expanded");
                    return Some((name.to_string(), set));
                }
                Ok(_) => {
                    debug!(word = word, source = name; "Source knows nothing about word");
                }
                Err(err) => {
                    debug!(word = word, source = name, err:% = err; "Source unavailable");
                }
            }
        }
        None
    }

    /// Expands up to `max_words` of `nodes`, heaviest first (ties broken by id).
    ///
    /// Target terms are normalized; a term that matches an existing node, or a
    /// node added earlier in this run, reuses that node. Self references and
    /// repeated `(source, target, relation)` edges are dropped.
    pub fn extract_graph_semantics(&self, nodes: &[Node], max_words: usize) -> SemanticExpansion {
        let mut expansion = SemanticExpansion::default();
        let mut known: HashSet<String> = nodes.iter().map(|node| node.id().to_string()).collect();
        let mut seen_edges = HashSet::new();

        let selected = select_words(nodes, max_words);
        info!(
            selected = selected.len(),
            sources = self.chain.len();
            "Expanding words"
        );

        for word in selected {
            let Some((source_name, set)) = self.relationships_for(word) else {
                info!(word = word; "No semantic source expanded word, skipping");
                expansion.skipped.push(word.to_string());
                continue;
            };

            for (relation, term) in set.iter() {
                let target = normalize_term(term);
                if target.is_empty() || target == word {
                    continue;
                }
                if known.insert(target.clone()) {
                    expansion.nodes.push(Node::semantic(term));
                }
                if seen_edges.insert((word.to_string(), target.clone(), relation)) {
                    expansion.edges.push(Edge::new(
                        word,
                        target,
                        SEMANTIC_EDGE_WEIGHT,
                        relation,
                    ));
                }
            }
            expansion.expanded.push((word.to_string(), source_name));
        }

        info!(
            nodes = expansion.nodes.len(),
            edges = expansion.edges.len(),
            skipped = expansion.skipped.len();
            "Expansion finished"
        );
        expansion
    }

    /// Expands `graph` in place and returns what was added.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] if the expansion could not be merged, which only
    /// happens when `graph` itself violates its invariants.
    pub fn expand(&self, graph: &mut Graph, max_words: usize) -> Result<SemanticExpansion, GraphError> {
        let nodes: Vec<Node> = graph.nodes().cloned().collect();
        let expansion = self.extract_graph_semantics(&nodes, max_words);
        graph.merge(expansion.nodes.clone(), expansion.edges.clone())?;
        Ok(expansion)
    }
}

/// Ids of the `max_words` heaviest nodes, ties broken alphabetically.
fn select_words(nodes: &[Node], max_words: usize) -> Vec<&str> {
    let mut ranked: Vec<&Node> = nodes.iter().collect();
    ranked.sort_by(|a, b| {
        b.weight()
            .partial_cmp(&a.weight())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id().cmp(b.id()))
    });
    ranked
        .into_iter()
        .take(max_words)
        .map(Node::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    };

    use lexigraph_core::graph::{Origin, RelationType};

    use super::*;
    use crate::semantic::{SourceUnavailable, sources::StaticFallback};

    /// Scripted source recording the words it was asked about.
    struct Scripted {
        name: &'static str,
        answer: Option<RelationshipSet>,
        calls: AtomicUsize,
        words: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(name: &'static str, answer: Option<RelationshipSet>) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer,
                calls: AtomicUsize::new(0),
                words: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(AtomicOrdering::SeqCst)
        }
    }

    impl SemanticSource for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn query(&self, word: &str) -> Result<RelationshipSet, SourceUnavailable> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            self.words.lock().unwrap().push(word.to_string());
            self.answer.clone().ok_or_else(|| SourceUnavailable::Timeout {
                source_name: self.name.to_string(),
            })
        }
    }

    fn extractor(sources: Vec<Arc<dyn SemanticSource>>) -> SemanticExtractor {
        SemanticExtractor::new(SourceChain::new(sources), Arc::new(SemanticCache::default()))
    }

    fn graph(words: &[(&str, f64)]) -> Graph {
        let nodes = words
            .iter()
            .map(|(id, weight)| Node::original(*id, *id, *weight))
            .collect();
        Graph::from_parts(nodes, Vec::new()).unwrap()
    }

    #[test]
    fn test_first_non_empty_source_wins() {
        let failing = Scripted::new("reasoner", None);
        let empty = Scripted::new("lexicon", Some(RelationshipSet::new()));
        let winner = Scripted::new(
            "encyclopedia",
            Some(RelationshipSet::new().with(RelationType::IsA, "activity")),
        );
        let never = Scripted::new(
            "fallback",
            Some(RelationshipSet::new().with(RelationType::IsA, "thing")),
        );
        let extractor = extractor(vec![
            failing.clone(),
            empty.clone(),
            winner.clone(),
            never.clone(),
        ]);

        let (source, set) = extractor.relationships_for("game").unwrap();

        assert_eq!(source, "encyclopedia");
        assert_eq!(set, RelationshipSet::new().with(RelationType::IsA, "activity"));
        assert_eq!(failing.calls(), 1);
        assert_eq!(empty.calls(), 1);
        assert_eq!(never.calls(), 0);
    }

    #[test]
    fn test_expand_adds_semantic_nodes_and_edges() {
        let mut graph = graph(&[("game", 2.0), ("news", 1.0)]);
        let extractor = extractor(vec![Arc::new(StaticFallback::new())]);

        let expansion = extractor.expand(&mut graph, 10).unwrap();

        assert!(graph.has_edge("game", "activity", RelationType::IsA));
        assert!(graph.has_edge("news", "information", RelationType::IsA));
        assert_eq!(graph.node("activity").unwrap().origin(), Origin::Semantic);
        assert_eq!(graph.node("activity").unwrap().weight(), 1.0);
        assert!(graph.validate().is_ok());
        assert!(expansion.skipped().is_empty());
        assert_eq!(
            expansion.expanded(),
            &[
                ("game".to_string(), "static_fallback".to_string()),
                ("news".to_string(), "static_fallback".to_string()),
            ]
        );
    }

    #[test]
    fn test_targets_matching_existing_nodes_are_reused() {
        // "sport" is both an original word and related_to "game".
        let mut graph = graph(&[("game", 3.0), ("sport", 1.0)]);
        let extractor = extractor(vec![Arc::new(StaticFallback::new())]);

        let expansion = extractor.expand(&mut graph, 2).unwrap();

        assert!(graph.has_edge("game", "sport", RelationType::RelatedTo));
        assert!(graph.has_edge("sport", "game", RelationType::RelatedTo));
        assert_eq!(graph.node("sport").unwrap().origin(), Origin::Original);
        assert!(expansion.nodes().iter().all(|n| n.id() != "sport" && n.id() != "game"));
        // "activity" is shared by both words but created once.
        assert_eq!(expansion.nodes().iter().filter(|n| n.id() == "activity").count(), 1);
    }

    #[test]
    fn test_self_references_and_duplicate_targets_are_dropped() {
        let set = RelationshipSet::new()
            .with(RelationType::IsA, "Game")
            .with(RelationType::IsA, "Activity")
            .with(RelationType::IsA, "activity.");
        let extractor = extractor(vec![Scripted::new("s", Some(set))]);

        let expansion = extractor.extract_graph_semantics(&graph(&[("game", 1.0)]).into_parts().0, 1);

        assert_eq!(expansion.nodes().len(), 1);
        assert_eq!(expansion.nodes()[0].id(), "activity");
        assert_eq!(expansion.edges().len(), 1);
    }

    #[test]
    fn test_selection_by_weight_then_id() {
        let source = Scripted::new("s", None);
        let extractor = extractor(vec![source.clone()]);
        let nodes = graph(&[("zeta", 1.0), ("beta", 5.0), ("alpha", 1.0), ("gamma", 0.5)])
            .into_parts()
            .0;

        let expansion = extractor.extract_graph_semantics(&nodes, 3);

        assert_eq!(*source.words.lock().unwrap(), vec!["beta", "alpha", "zeta"]);
        assert_eq!(expansion.skipped(), &["beta", "alpha", "zeta"]);
        assert_eq!(expansion.warnings().len(), 3);
    }

    #[test]
    fn test_all_sources_failing_skips_word() {
        let extractor = extractor(vec![Scripted::new("a", None), Scripted::new("b", None)]);
        let mut graph = graph(&[("cringe", 1.0)]);

        let expansion = extractor.expand(&mut graph, 10).unwrap();

        assert_eq!(expansion.skipped(), &["cringe"]);
        assert_eq!(
            expansion.warnings(),
            vec![Warning::ExtractionSkipped {
                word: "cringe".to_string()
            }]
        );
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_answers_are_served_from_cache() {
        let source = Scripted::new(
            "s",
            Some(RelationshipSet::new().with(RelationType::UsedFor, "fun")),
        );
        let extractor = extractor(vec![source.clone()]);
        let nodes = graph(&[("game", 1.0)]).into_parts().0;

        extractor.extract_graph_semantics(&nodes, 1);
        extractor.extract_graph_semantics(&nodes, 1);

        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_zero_max_words_expands_nothing() {
        let source = Scripted::new("s", None);
        let extractor = extractor(vec![source.clone()]);

        let expansion = extractor.extract_graph_semantics(&graph(&[("game", 1.0)]).into_parts().0, 0);

        assert_eq!(expansion, SemanticExpansion::default());
        assert_eq!(source.calls(), 0);
    }
}
