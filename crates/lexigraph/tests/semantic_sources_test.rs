//! Integration tests for the HTTP semantic sources and the fallback chain.
//!
//! The sources use blocking clients, so the mock servers are started on a
//! tokio runtime owned by the test and queried from the test thread.

use std::{sync::Arc, time::Duration};

use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

use lexigraph::{
    GraphBuilder, SourceType,
    config::AppConfig,
    export::RenderFormat,
    graph::{Origin, RelationType},
    relationship::RelationshipSet,
    semantic::{
        SemanticCache, SemanticExtractor, SemanticSource, SourceChain, SourceUnavailable,
        sources::{Encyclopedia, LexicalDb, LocalReasoner, StaticFallback},
    },
};

const GAME_EXTRACT: &str = "A game is an activity with rules and players.";

struct MockService {
    runtime: Runtime,
    server: MockServer,
}

impl MockService {
    fn start() -> Self {
        let runtime = Runtime::new().expect("failed to start tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { runtime, server }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.server.uri())
    }

    fn received(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .map_or(0, |requests| requests.len())
    }
}

fn reasoner(service: &MockService, timeout: Duration) -> LocalReasoner {
    LocalReasoner::new(
        service.url("/api/generate"),
        Some("llama3.2".to_string()),
        timeout,
    )
    .unwrap()
}

fn encyclopedia(service: &MockService) -> Encyclopedia {
    Encyclopedia::new(&service.url("/page/summary"), Duration::from_secs(2)).unwrap()
}

fn mount_summary(service: &MockService, word: &str, extract: &str) {
    service.mount(
        Mock::given(method("GET"))
            .and(path(format!("/page/summary/{word}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": word,
                "extract": extract,
            }))),
    );
}

#[test]
fn test_local_reasoner_structured_response() {
    let service = MockService::start();
    service.mount(
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({"model": "llama3.2", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "is_a": ["activity"],
                "has_attribute": ["rules"],
            }))),
    );

    let set = reasoner(&service, Duration::from_secs(2)).query("game").unwrap();

    assert!(set.is_a().contains("activity"));
    assert!(set.has_attribute().contains("rules"));
    assert_eq!(service.received(), 1);
}

#[test]
fn test_local_reasoner_wrapped_response() {
    let service = MockService::start();
    service.mount(
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.2",
                "response": "Here is the JSON:\n{\"used_for\": [\"entertainment\"]}",
                "done": true,
            }))),
    );

    let set = reasoner(&service, Duration::from_secs(2)).query("game").unwrap();
    assert!(set.used_for().contains("entertainment"));
}

#[test]
fn test_local_reasoner_timeout() {
    let service = MockService::start();
    service.mount(
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"is_a": ["activity"]}))
                    .set_delay(Duration::from_millis(800)),
            ),
    );

    let err = reasoner(&service, Duration::from_millis(100))
        .query("game")
        .unwrap_err();
    assert!(matches!(err, SourceUnavailable::Timeout { .. }), "{err:?}");
}

#[test]
fn test_local_reasoner_server_error() {
    let service = MockService::start();
    service.mount(
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500)),
    );

    let err = reasoner(&service, Duration::from_secs(2))
        .query("game")
        .unwrap_err();
    assert!(matches!(err, SourceUnavailable::Status { status: 500, .. }));
    assert_eq!(err.source_name(), "local_reasoner");
}

#[test]
fn test_local_reasoner_garbage_response() {
    let service = MockService::start();
    service.mount(
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "no idea"}))),
    );

    let err = reasoner(&service, Duration::from_secs(2))
        .query("game")
        .unwrap_err();
    assert!(matches!(err, SourceUnavailable::Malformed { .. }));
}

#[test]
fn test_encyclopedia_extracts_relationships() {
    let service = MockService::start();
    mount_summary(&service, "chess", "Chess is a board game used for recreation.");

    let set = encyclopedia(&service).query("chess").unwrap();

    assert!(set.is_a().contains("board game"));
    assert!(set.used_for().contains("recreation"));
}

#[test]
fn test_encyclopedia_missing_article() {
    let service = MockService::start();
    service.mount(
        Mock::given(method("GET"))
            .and(path("/page/summary/zyzzyva"))
            .respond_with(ResponseTemplate::new(404)),
    );

    let err = encyclopedia(&service).query("zyzzyva").unwrap_err();
    assert!(matches!(err, SourceUnavailable::Status { status: 404, .. }));
}

#[test]
fn test_encyclopedia_without_matches() {
    let service = MockService::start();
    mount_summary(&service, "hmm", "Hmm.");

    let err = encyclopedia(&service).query("hmm").unwrap_err();
    assert!(matches!(err, SourceUnavailable::NoMatches { .. }));
}

#[test]
fn test_fallback_uses_exactly_the_first_working_source() {
    let service = MockService::start();
    service.mount(
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500)),
    );
    mount_summary(&service, "game", GAME_EXTRACT);

    let sources: Vec<Arc<dyn SemanticSource>> = vec![
        Arc::new(reasoner(&service, Duration::from_secs(2))),
        Arc::new(LexicalDb::unloaded("no dataset configured")),
        Arc::new(encyclopedia(&service)),
        Arc::new(StaticFallback::new()),
    ];
    let cache = Arc::new(SemanticCache::default());
    let extractor = SemanticExtractor::new(SourceChain::new(sources), Arc::clone(&cache));

    let (source, set) = extractor.relationships_for("game").unwrap();

    let expected = RelationshipSet::new()
        .with(RelationType::IsA, "activity")
        .with(RelationType::HasAttribute, "rules");
    assert_eq!(source, "encyclopedia");
    assert_eq!(set, expected);
    assert!(cache.entry("game", "encyclopedia").is_some());
    assert!(cache.entry("game", "local_reasoner").is_none());
    assert!(cache.entry("game", "static_fallback").is_none());
}

#[test]
fn test_cached_answers_skip_the_network() {
    let service = MockService::start();
    mount_summary(&service, "game", GAME_EXTRACT);

    let chain = SourceChain::default().with_source(Arc::new(encyclopedia(&service)));
    let extractor = SemanticExtractor::new(chain, Arc::new(SemanticCache::default()));

    let first = extractor.relationships_for("game");
    let second = extractor.relationships_for("game");

    assert_eq!(first, second);
    assert_eq!(service.received(), 1);
}

#[test]
fn test_pipeline_with_configured_http_sources() {
    let service = MockService::start();
    service.mount(
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(503)),
    );
    mount_summary(&service, "game", GAME_EXTRACT);

    let config: AppConfig = serde_json::from_value(json!({
        "semantic": {
            "max_words": 1,
            "local_reasoner": {"endpoint": service.url("/api/generate"), "timeout_secs": 2},
            "lexical_db": {"enabled": false},
            "encyclopedia": {"base_url": service.url("/page/summary"), "timeout_secs": 2},
            "static_fallback": {"enabled": false},
        },
        "layout": {"seed": 3, "iterations": 20},
    }))
    .unwrap();

    let output = GraphBuilder::new(config)
        .unwrap()
        .run("game game news", SourceType::Markdown, RenderFormat::Json)
        .unwrap();

    let graph = output.graph();
    assert!(graph.has_edge("game", "activity", RelationType::IsA));
    assert!(graph.has_edge("game", "rules", RelationType::HasAttribute));
    assert_eq!(graph.node("rules").unwrap().origin(), Origin::Semantic);
    assert!(!graph.contains_node("players"));
}
