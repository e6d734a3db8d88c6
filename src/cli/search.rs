use super::run::build_agent;
use crate::models::AppConfig;
use crate::search::{SearchProvider, TavilyClient};
use crate::session::TerminalFrontend;
use crate::Result;
use anyhow::Context;

/// Run a single query.
///
/// With `json` the whole response is printed and nothing is asked; otherwise the
/// usual save/email prompts follow each result.
pub async fn run(
    config: &AppConfig,
    query: &str,
    max_results: Option<usize>,
    json: bool,
) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("Search query cannot be empty");
    }

    let mut config = config.clone();
    if let Some(n) = max_results {
        config.search.max_results = n;
    }

    if json {
        let provider = TavilyClient::new(&config.search)?;
        let response = provider.search(&config.search.request(query)).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let agent = build_agent(&config)?;
    let (mut console, handle) =
        TerminalFrontend::spawn().context("Failed to start terminal front end")?;
    agent.review(&mut console, query).await;
    handle.finish(console);
    Ok(())
}
