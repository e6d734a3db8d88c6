//! Integration tests for the interactive search session
//!
//! Drives `SearchAgent` with scripted input, a stub search provider and a
//! recording mailer. Nothing here touches the network.

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tavily_sss::export::HtmlExporter;
use tavily_sss::mail::{MailError, Mailer, OutgoingMail};
use tavily_sss::models::{SearchConfig, SearchRequest, SearchResponse, SearchResult};
use tavily_sss::search::{SearchError, SearchProvider};
use tavily_sss::session::{Console, MemorySink, ReviewOutcome, ScriptedInput, SearchAgent};
use tempfile::TempDir;

// =============================================================================
// Test doubles
// =============================================================================

#[derive(Default)]
struct StubProvider {
    results: Vec<SearchResult>,
    fail: bool,
    requests: Mutex<Vec<SearchRequest>>,
}

impl StubProvider {
    fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.query.clone())
            .collect()
    }
}

#[async_trait]
impl SearchProvider for StubProvider {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(SearchError::Api {
                status: 401,
                message: "Unauthorized: missing or invalid API key.".into(),
            });
        }
        Ok(SearchResponse {
            query: request.query.clone(),
            results: self.results.clone(),
            ..Default::default()
        })
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn key_preview(&self) -> Option<String> {
        Some("tvly-12345...".into())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    reject_login: bool,
}

impl RecordingMailer {
    fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.reject_login {
            return Err(MailError::Authentication("sender@example.com".into()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }

    fn sender(&self) -> &str {
        "sender@example.com"
    }
}

struct Harness {
    provider: Arc<StubProvider>,
    mailer: Arc<RecordingMailer>,
    sink: Arc<MemorySink>,
    temp_dir: TempDir,
}

impl Harness {
    fn new(provider: StubProvider, mailer: RecordingMailer) -> Self {
        Self {
            provider: Arc::new(provider),
            mailer: Arc::new(mailer),
            sink: Arc::new(MemorySink::new()),
            temp_dir: TempDir::new().unwrap(),
        }
    }

    fn agent(&self) -> SearchAgent {
        SearchAgent::new(
            self.provider.clone(),
            self.mailer.clone(),
            HtmlExporter::with_directory(self.output_dir(), false),
            SearchConfig {
                max_results: 3,
                ..Default::default()
            },
        )
    }

    fn console(&self, lines: &[&str]) -> Console {
        Console::new(
            self.sink.clone(),
            Box::new(ScriptedInput::new(lines.iter().copied())),
        )
    }

    fn output_dir(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("saved_html")
    }

    fn output(&self) -> String {
        self.sink.contents()
    }
}

fn sample_result(title: &str) -> SearchResult {
    SearchResult {
        title: title.into(),
        url: format!("https://example.com/{}", title.to_lowercase()),
        content: "snippet".into(),
        score: Some(0.9),
        raw_content: Some(format!("# {}\nUse `cargo build` & relax", title)),
        ..Default::default()
    }
}

fn saved_pages(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut pages: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    pages.sort();
    pages
}

// =============================================================================
// Query loop
// =============================================================================

#[tokio::test]
async fn test_quit_ends_session() {
    let harness = Harness::new(StubProvider::default(), RecordingMailer::default());
    let mut console = harness.console(&["QUIT"]);

    harness.agent().run(&mut console).await;

    let output = harness.output();
    assert!(output.contains("TAVILY Research Document Creator"));
    assert!(output.contains("✅ API Key loaded: tvly-12345..."));
    assert!(output.contains("👋 Goodbye!"));
    assert!(harness.provider.queries().is_empty());
}

#[tokio::test]
async fn test_closed_input_ends_session() {
    let harness = Harness::new(StubProvider::default(), RecordingMailer::default());
    let mut console = harness.console(&[]);

    harness.agent().run(&mut console).await;

    assert!(harness.output().contains("👋 Goodbye!"));
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let harness = Harness::new(StubProvider::default(), RecordingMailer::default());
    let mut console = harness.console(&["   ", "quit"]);

    harness.agent().run(&mut console).await;

    assert!(harness.output().contains("❌ Search query cannot be empty!"));
    assert!(harness.provider.queries().is_empty());
}

#[tokio::test]
async fn test_search_error_is_reported_and_loop_continues() {
    let harness = Harness::new(StubProvider::failing(), RecordingMailer::default());
    let mut console = harness.console(&["rust", "quit"]);

    harness.agent().run(&mut console).await;

    let output = harness.output();
    assert!(output.contains("❌ Error in search: Search API returned status 401"));
    assert!(output.contains("👋 Goodbye!"));
    assert_eq!(harness.provider.queries(), vec!["rust"]);
}

#[tokio::test]
async fn test_query_is_trimmed_and_uses_configured_limit() {
    let harness = Harness::new(StubProvider::default(), RecordingMailer::default());
    let mut console = harness.console(&["  async rust  ", "quit"]);

    harness.agent().run(&mut console).await;

    let requests = harness.provider.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "async rust");
    assert_eq!(requests[0].max_results, 3);
    assert!(harness.output().contains("Found 0 results:"));
}

// =============================================================================
// Result review
// =============================================================================

#[tokio::test]
async fn test_result_is_shown_in_full() {
    let harness = Harness::new(
        StubProvider::with_results(vec![sample_result("Cargo")]),
        RecordingMailer::default(),
    );
    let mut console = harness.console(&["n", "n"]);

    let outcome = harness.agent().review(&mut console, "cargo").await;

    assert_eq!(outcome, ReviewOutcome::Done);
    let output = harness.output();
    assert!(output.contains("🔍 SEARCH AGENT: Searching for 'cargo'..."));
    assert!(output.contains("Found 1 results:"));
    assert!(output.contains("Result #1"));
    assert!(output.contains("📌 Title: Cargo"));
    assert!(output.contains("🔗 URL: https://example.com/cargo"));
    assert!(output.contains("⭐ Relevance Score: 0.9"));
    assert!(output.contains("# Cargo\nUse `cargo build` & relax"));
    assert!(output.contains("Do you want to save this result to a file? (y/n): "));
    assert!(output.contains("Would you like to send this response via email? (y/n): "));
    assert!(saved_pages(&harness.output_dir()).is_empty());
    assert!(harness.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_save_and_email_flow() {
    let harness = Harness::new(
        StubProvider::with_results(vec![sample_result("Cargo")]),
        RecordingMailer::default(),
    );
    let mut console = harness.console(&["y", "y", " reader@example.com "]);

    let outcome = harness.agent().review(&mut console, "cargo").await;
    assert_eq!(outcome, ReviewOutcome::Done);

    let pages = saved_pages(&harness.output_dir());
    assert_eq!(pages.len(), 1);
    assert!(pages[0].starts_with("result_") && pages[0].ends_with(".html"));

    let html = fs::read_to_string(harness.output_dir().join(&pages[0])).unwrap();
    assert!(html.contains("<h1>Cargo</h1>"));
    assert!(html.contains("<code>cargo build</code>"));
    assert!(html.contains("&amp; relax"));

    let sent = harness.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "reader@example.com");
    assert_eq!(sent[0].subject, "Search Result: Cargo");
    assert_eq!(sent[0].text_body, "# Cargo\nUse `cargo build` & relax");
    assert_eq!(
        sent[0].html_body,
        "<h1>Cargo</h1>\n<p>Use <code>cargo build</code> &amp; relax</p>"
    );

    let output = harness.output();
    assert!(output.contains("✅ File saved to:"));
    assert!(!output.contains("🌐 Opening file in browser..."));
    assert!(output.contains("📤 Sending email from sender@example.com to reader@example.com..."));
    assert!(output.contains("🎉 Email sent successfully to reader@example.com!"));
}

#[tokio::test]
async fn test_login_failure_shows_checklist() {
    let harness = Harness::new(
        StubProvider::with_results(vec![sample_result("Cargo")]),
        RecordingMailer {
            reject_login: true,
            ..Default::default()
        },
    );
    let mut console = harness.console(&["n", "y", "reader@example.com"]);

    let outcome = harness.agent().review(&mut console, "cargo").await;

    assert_eq!(outcome, ReviewOutcome::Done);
    let output = harness.output();
    assert!(output.contains("❌ CRITICAL ERROR: SMTP login failed."));
    assert!(output.contains("sender@example.com"));
    assert!(!output.contains("🎉 Email sent successfully"));
}

#[tokio::test]
async fn test_continue_prompt_between_results() {
    let harness = Harness::new(
        StubProvider::with_results(vec![
            sample_result("First"),
            sample_result("Second"),
            sample_result("Third"),
        ]),
        RecordingMailer::default(),
    );
    // First result: skip both, continue. Second: skip both, stop.
    let mut console = harness.console(&["n", "n", "y", "n", "n", "n"]);

    let outcome = harness.agent().review(&mut console, "many").await;

    assert_eq!(outcome, ReviewOutcome::Done);
    let output = harness.output();
    assert!(output.contains("Result #1"));
    assert!(output.contains("Result #2"));
    assert!(!output.contains("Result #3"));
    assert_eq!(output.matches("Continue to the next result? (y/n): ").count(), 2);
}

#[tokio::test]
async fn test_no_continue_prompt_after_last_result() {
    let harness = Harness::new(
        StubProvider::with_results(vec![sample_result("Only")]),
        RecordingMailer::default(),
    );
    let mut console = harness.console(&["n", "n", "quit"]);

    harness.agent().run(&mut console).await;

    let output = harness.output();
    assert!(!output.contains("Continue to the next result?"));
    assert!(output.contains("👋 Goodbye!"));
}

#[tokio::test]
async fn test_input_closed_mid_review() {
    let harness = Harness::new(
        StubProvider::with_results(vec![sample_result("Cargo")]),
        RecordingMailer::default(),
    );
    let mut console = harness.console(&["y", "y"]);

    let outcome = harness.agent().review(&mut console, "cargo").await;

    assert_eq!(outcome, ReviewOutcome::InputClosed);
    assert_eq!(saved_pages(&harness.output_dir()).len(), 1);
    assert!(harness.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_available_fields_include_null_payload_keys() {
    let result: SearchResult = serde_json::from_str(
        r#"{"title": "Cargo", "url": "https://example.com", "content": "snippet", "raw_content": null}"#,
    )
    .unwrap();
    let harness = Harness::new(
        StubProvider::with_results(vec![result]),
        RecordingMailer::default(),
    );
    let mut console = harness.console(&["n", "n"]);

    harness.agent().review(&mut console, "cargo").await;

    let output = harness.output();
    let fields_line = output
        .lines()
        .find(|line| line.starts_with("🔍 Available data fields:"))
        .unwrap();
    assert!(fields_line.contains("raw_content"));
    assert!(!fields_line.contains("score"));
}
