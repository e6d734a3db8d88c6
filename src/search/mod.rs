//! Web search providers
//!
//! The session talks to search backends through [`SearchProvider`]; the only
//! production backend is the Tavily REST API.

pub mod tavily;

use crate::models::{SearchRequest, SearchResponse};
use async_trait::async_trait;

pub use tavily::TavilyClient;

/// Errors that can occur while searching
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("No search API key configured (set {} or search.api_key)", crate::models::config::API_KEY_ENV)]
    MissingApiKey,

    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Search API returned status {status}: {message}")]
    Api { status: u16, message: String },
}

/// A backend that answers search queries
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a query and return the parsed response
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;

    /// Whether credentials are available
    fn is_configured(&self) -> bool;

    /// Leading characters of the credential, safe to show
    fn key_preview(&self) -> Option<String> {
        None
    }

    /// Display name
    fn name(&self) -> &'static str;
}
