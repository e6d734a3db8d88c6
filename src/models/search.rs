//! Search request and response models
//!
//! Mirrors the JSON payloads of the Tavily search endpoint. Unknown result
//! fields are kept so the session can list everything the API returned.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How much effort the search API spends per query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

/// Body of a search call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
    pub search_depth: SearchDepth,
    pub include_raw_content: bool,
}

impl SearchRequest {
    /// Request with default depth (advanced) and raw content included
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
            search_depth: SearchDepth::default(),
            include_raw_content: true,
        }
    }
}

/// A single search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(try_from = "Map<String, Value>")]
pub struct SearchResult {
    pub title: String,

    pub url: String,

    /// Summary snippet
    pub content: String,

    /// Relevance score, when provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Full page text (requested with `include_raw_content`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,

    /// Any other fields the API sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Keys present in the payload this result was parsed from
    #[serde(skip)]
    pub payload_keys: Vec<String>,
}

/// Typed view of a result object; nulls read as absent values
#[derive(Deserialize)]
struct ResultFields {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    raw_content: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for SearchResult {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let payload_keys = object.keys().cloned().collect();
        let parsed: ResultFields = serde_json::from_value(Value::Object(object))?;

        Ok(Self {
            title: parsed.title.unwrap_or_default(),
            url: parsed.url.unwrap_or_default(),
            content: parsed.content.unwrap_or_default(),
            score: parsed.score,
            raw_content: parsed.raw_content,
            extra: parsed.extra,
            payload_keys,
        })
    }
}

impl SearchResult {
    /// Raw page content when present and non-empty, otherwise the summary
    pub fn full_content(&self) -> &str {
        match self.raw_content.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => &self.content,
        }
    }

    /// Names of the fields present in the payload, null-valued ones included.
    ///
    /// Results built in code report their populated fields instead.
    pub fn field_names(&self) -> Vec<String> {
        if !self.payload_keys.is_empty() {
            return self.payload_keys.clone();
        }

        let mut names = Vec::new();
        for (name, present) in [
            ("title", !self.title.is_empty()),
            ("url", !self.url.is_empty()),
            ("content", !self.content.is_empty()),
            ("score", self.score.is_some()),
            ("raw_content", self.raw_content.is_some()),
        ] {
            if present {
                names.push(name.to_string());
            }
        }
        names.extend(self.extra.keys().cloned());
        names
    }
}

/// Response of a search call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub results: Vec<SearchResult>,

    /// Other top-level fields (`answer`, `images`, `response_time`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
