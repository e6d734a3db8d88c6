use crate::export::HtmlExporter;
use crate::mail::SmtpMailer;
use crate::models::AppConfig;
use crate::search::TavilyClient;
use crate::session::{SearchAgent, TerminalFrontend};
use crate::Result;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Wire the production search client, mailer and exporter into an agent
pub fn build_agent(config: &AppConfig) -> Result<SearchAgent> {
    let provider = TavilyClient::new(&config.search).context("Failed to create search client")?;
    let mailer = SmtpMailer::new(&config.smtp);
    if !mailer.is_configured() {
        info!(user = %config.smtp.username, "no SMTP password configured, sending will fail");
    }
    let exporter = HtmlExporter::new(&config.output);

    Ok(SearchAgent::new(
        Arc::new(provider),
        Arc::new(mailer),
        exporter,
        config.search.clone(),
    ))
}

/// Interactive search loop on the terminal
pub async fn run(config: &AppConfig, config_path: Option<PathBuf>) -> Result<()> {
    let agent = build_agent(config)?.with_config_path(config_path);
    let (mut console, handle) =
        TerminalFrontend::spawn().context("Failed to start terminal front end")?;

    agent.run(&mut console).await;

    handle.finish(console);
    Ok(())
}
