//! Search-and-prompt loop
//!
//! Asks for a query, shows each result in full, and offers to save it as an
//! HTML page and to email it. Failures are reported to the user and the loop
//! carries on.

use super::Console;
use crate::export::HtmlExporter;
use crate::mail::{MailError, Mailer, OutgoingMail};
use crate::models::{SearchConfig, SearchRequest, SearchResult};
use crate::search::SearchProvider;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

const QUERY_PROMPT: &str = "\nEnter a search query (or 'quit' to exit): ";
const GOODBYE: &str = "\n👋 Goodbye!\n";

/// How a review of one query ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Back to the query prompt
    Done,
    /// The input side closed mid-review
    InputClosed,
}

/// Drives the interactive search session
pub struct SearchAgent {
    provider: Arc<dyn SearchProvider>,
    mailer: Arc<dyn Mailer>,
    exporter: HtmlExporter,
    settings: SearchConfig,
    config_path: Option<PathBuf>,
}

impl SearchAgent {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        mailer: Arc<dyn Mailer>,
        exporter: HtmlExporter,
        settings: SearchConfig,
    ) -> Self {
        Self {
            provider,
            mailer,
            exporter,
            settings,
            config_path: None,
        }
    }

    /// Config file reported in the startup diagnostics
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Request for `query` using the configured limits
    pub fn request(&self, query: &str) -> SearchRequest {
        self.settings.request(query)
    }

    /// Banner plus the query loop, until `quit` or closed input
    pub async fn run(&self, console: &mut Console) {
        self.print_banner(console);

        loop {
            let Some(line) = console.prompt(QUERY_PROMPT).await else {
                console.print(GOODBYE);
                break;
            };

            let query = line.trim();
            if query.eq_ignore_ascii_case("quit") {
                console.print(GOODBYE);
                break;
            }
            if query.is_empty() {
                console.print("❌ Search query cannot be empty!\n");
                continue;
            }

            if self.review(console, query).await == ReviewOutcome::InputClosed {
                console.print(GOODBYE);
                break;
            }
        }
    }

    fn print_banner(&self, console: &Console) {
        console.println(&"=".repeat(60));
        console.println("🤖 TAVILY Research Document Creator");
        console.println(&"=".repeat(60));
        console.println("");

        if self.provider.is_configured() {
            match self.provider.key_preview() {
                Some(preview) => console.println(&format!("✅ API Key loaded: {}", preview)),
                None => console.println("✅ API Key loaded"),
            }
            return;
        }

        console.println("❌ No API key found in environment variables");
        console.println("\n🔍 Debugging Info:");
        if let Ok(cwd) = std::env::current_dir() {
            console.println(&format!("   Current directory: {}", cwd.display()));
        }
        match &self.config_path {
            Some(path) => console.println(&format!(
                "   Config file: {} (exists: {})",
                path.display(),
                path.is_file()
            )),
            None => console.println("   Config file: none found"),
        }
    }

    /// Search for `query` and walk the user through the results
    pub async fn review(&self, console: &mut Console, query: &str) -> ReviewOutcome {
        console.print(&format!(
            "\n🔍 SEARCH AGENT: Searching for '{}'...\n\n",
            query
        ));

        let response = match self.provider.search(&self.request(query)).await {
            Ok(response) => response,
            Err(e) => {
                console.println(&format!("❌ Error in search: {}", e));
                return ReviewOutcome::Done;
            }
        };

        let total = response.results.len();
        console.print(&format!("Found {} results:\n", total));
        debug!(query, total, provider = self.provider.name(), "search results");

        for (index, result) in response.results.iter().enumerate() {
            show_result(console, index + 1, result);

            if self.offer_actions(console, result).await.is_none() {
                return ReviewOutcome::InputClosed;
            }

            if index + 1 < total {
                match console.confirm("Continue to the next result?").await {
                    Some(true) => {}
                    Some(false) => break,
                    None => return ReviewOutcome::InputClosed,
                }
            }
        }

        ReviewOutcome::Done
    }

    /// Save and email prompts; `None` if input closed
    async fn offer_actions(&self, console: &mut Console, result: &SearchResult) -> Option<()> {
        if console
            .confirm("Do you want to save this result to a file?")
            .await?
        {
            self.save(console, result);
        }

        if console
            .confirm("Would you like to send this response via email?")
            .await?
        {
            let recipient = console.prompt("Enter recipient email address: ").await?;
            self.send(console, result, recipient.trim()).await;
        }

        Some(())
    }

    fn save(&self, console: &Console, result: &SearchResult) {
        match self.exporter.save(result) {
            Ok(saved) => {
                console.println(&format!("\n✅ File saved to: {}", saved.path.display()));
                if saved.opened {
                    console.println("🌐 Opening file in browser...");
                }
            }
            Err(e) => console.println(&format!("❌ Error saving file: {:#}", e)),
        }
    }

    async fn send(&self, console: &Console, result: &SearchResult, recipient: &str) {
        console.println(&format!(
            "📤 Sending email from {} to {}...",
            self.mailer.sender(),
            recipient
        ));

        let mail = OutgoingMail::for_result(result, recipient);
        match self.mailer.send(&mail).await {
            Ok(()) => console.println(&format!("🎉 Email sent successfully to {}!", recipient)),
            Err(MailError::Authentication(user)) => {
                console.println("\n❌ CRITICAL ERROR: SMTP login failed.");
                console.println("   Please check:");
                console.println(&format!("   1. The SMTP username ({}) is correct.", user));
                console.println(
                    "   2. The password is an app password (not your regular account password).",
                );
            }
            Err(e) => console.println(&format!("❌ Error sending email: {}", e)),
        }
    }
}

fn show_result(console: &Console, number: usize, result: &SearchResult) {
    let content = result.full_content();
    let score = result
        .score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    console.println(&format!("\n{}", "=".repeat(70)));
    console.println(&format!("Result #{}", number));
    console.println(&"=".repeat(70));
    console.println(&format!("📌 Title: {}", result.title));
    console.println(&format!("🔗 URL: {}", result.url));
    console.println(&format!("⭐ Relevance Score: {}", score));
    console.println(&format!("📊 Content Length: {} characters", content.chars().count()));
    console.println("\n📄 Full Content:");
    console.println(&"-".repeat(70));
    console.println(content);
    console.println(&"-".repeat(70));
    console.println("");
    console.println(&format!(
        "🔍 Available data fields: {}",
        result.field_names().join(", ")
    ));
    console.println("");
}
