//! Semantic source backed by a local reasoning service.
//!
//! Speaks the Ollama `/api/generate` dialect: a JSON request with a prompt,
//! an optional model and `stream: false`. The service may answer with the
//! relationship object directly, or wrap free text containing that object
//! in a `response`, `text` or `content` field.

use std::time::Duration;

use log::{debug, trace};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use lexigraph_core::{graph::RelationType, relationship::RelationshipSet};

use crate::{
    config::{ConfigError, LocalReasonerConfig},
    semantic::source::{SemanticSource, SourceUnavailable},
};

pub const NAME: &str = "local_reasoner";

const TEXT_FIELDS: [&str; 3] = ["response", "text", "content"];

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    stream: bool,
}

/// HTTP client for a local reasoning endpoint.
#[derive(Debug, Clone)]
pub struct LocalReasoner {
    client: Client,
    endpoint: String,
    model: Option<String>,
}

impl LocalReasoner {
    /// Creates a reasoner posting to `endpoint` with a hard per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConfigError::HttpClient {
                source_name: NAME,
                message: err.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model,
        })
    }

    pub fn from_config(config: &LocalReasonerConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.endpoint(),
            config.model().map(str::to_string),
            config.timeout(),
        )
    }

    fn prompt(word: &str) -> String {
        format!(
            "List semantic relationships for the word \"{word}\". \
             Reply with only a JSON object with the keys is_a, has_attribute, \
             used_for and related_to, each an array of short lowercase terms."
        )
    }
}

impl SemanticSource for LocalReasoner {
    fn name(&self) -> &str {
        NAME
    }

    fn query(&self, word: &str) -> Result<RelationshipSet, SourceUnavailable> {
        debug!(source = NAME, word = word, endpoint = self.endpoint.as_str(); "Querying source");

        let request = GenerateRequest {
            prompt: Self::prompt(word),
            model: self.model.as_deref(),
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|err| SourceUnavailable::from_reqwest(NAME, &err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceUnavailable::Status {
                source_name: NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .map_err(|err| SourceUnavailable::from_reqwest(NAME, &err))?;
        trace!(source = NAME, body:% = body; "Source response");

        parse_response(&body)
    }
}

/// Reads a relationship set out of a service response.
pub(crate) fn parse_response(body: &Value) -> Result<RelationshipSet, SourceUnavailable> {
    let is_structured = body.as_object().is_some_and(|object| {
        RelationType::SEMANTIC
            .iter()
            .any(|relation| object.contains_key(relation.as_str()))
    });
    if is_structured {
        return decode(body.clone());
    }

    let text = TEXT_FIELDS
        .iter()
        .find_map(|field| body.get(field).and_then(Value::as_str))
        .ok_or_else(|| malformed("response has no relationship object or text field"))?;

    let object = extract_json_object(text)
        .ok_or_else(|| malformed("response text contains no JSON object"))?;
    let value: Value = serde_json::from_str(object).map_err(|err| malformed(err.to_string()))?;
    decode(value)
}

fn decode(value: Value) -> Result<RelationshipSet, SourceUnavailable> {
    serde_json::from_value::<RelationshipSet>(value)
        .map(RelationshipSet::sanitized)
        .map_err(|err| malformed(err.to_string()))
}

/// Returns the outermost `{...}` span of `text`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn malformed(message: impl Into<String>) -> SourceUnavailable {
    SourceUnavailable::Malformed {
        source_name: NAME.to_string(),
        message: message.into(),
    }
}
