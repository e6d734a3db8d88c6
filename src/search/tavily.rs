use super::{SearchError, SearchProvider};
use crate::models::{SearchConfig, SearchRequest, SearchResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest error body echoed back to the user
const MAX_ERROR_BODY: usize = 200;

/// Client for the Tavily search endpoint
pub struct TavilyClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl TavilyClient {
    /// Build a client from config; the key is resolved from the environment first
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tavily-sss/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.resolve_api_key(),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;

        debug!(
            query = %request.query,
            max_results = request.max_results,
            endpoint = %self.endpoint,
            "tavily search"
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "tavily search failed");
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let response: SearchResponse = resp.json().await?;
        debug!(results = response.results.len(), "tavily search complete");
        Ok(response)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn key_preview(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .filter(|key| key.chars().count() > 10)
            .map(|key| format!("{}...", key.chars().take(10).collect::<String>()))
    }

    fn name(&self) -> &'static str {
        "Tavily"
    }
}

/// Pull a readable message out of an error body.
///
/// Tavily reports `{"detail": {"error": "..."}}`; anything else is echoed, truncated.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let detail = parsed.as_ref().and_then(|v| {
        v.pointer("/detail/error")
            .or_else(|| v.get("detail"))
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
    });

    if let Some(message) = detail {
        return message.to_string();
    }

    let body = body.trim();
    if body.is_empty() {
        return "(empty response)".to_string();
    }
    if body.chars().count() > MAX_ERROR_BODY {
        let truncated: String = body.chars().take(MAX_ERROR_BODY).collect();
        format!("{}...", truncated)
    } else {
        body.to_string()
    }
}
