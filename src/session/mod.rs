//! Interactive session plumbing
//!
//! The agent never touches stdin/stdout directly. It writes through an
//! [`OutputSink`] and reads through an [`InputSource`], both injected via
//! [`Console`]. The terminal front end backs them with channels; tests back
//! them with memory.

pub mod agent;
pub mod memory;
pub mod terminal;

use async_trait::async_trait;
use std::sync::Arc;

pub use agent::{ReviewOutcome, SearchAgent};
pub use memory::{MemorySink, ScriptedInput};
pub use terminal::{TerminalFrontend, TerminalHandle};

/// Destination for text shown to the user, displayed in append order
pub trait OutputSink: Send + Sync {
    fn append(&self, text: &str);
}

/// Source of lines submitted by the user
#[async_trait]
pub trait InputSource: Send {
    /// Wait for the next submitted line; `None` once input is closed
    async fn next_line(&mut self) -> Option<String>;
}

/// Output sink and input source handed to whoever needs to talk to the user
pub struct Console {
    sink: Arc<dyn OutputSink>,
    source: Box<dyn InputSource>,
}

impl Console {
    pub fn new(sink: Arc<dyn OutputSink>, source: Box<dyn InputSource>) -> Self {
        Self { sink, source }
    }

    pub fn print(&self, text: &str) {
        self.sink.append(text);
    }

    pub fn println(&self, text: &str) {
        self.sink.append(text);
        self.sink.append("\n");
    }

    /// Show `prompt` and wait for the user's line, without the trailing newline
    pub async fn prompt(&mut self, prompt: &str) -> Option<String> {
        self.sink.append(prompt);
        let line = self.source.next_line().await?;
        Some(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask a yes/no question; only `y` (any case) counts as yes
    pub async fn confirm(&mut self, question: &str) -> Option<bool> {
        let answer = self.prompt(&format!("{} (y/n): ", question)).await?;
        Some(answer.trim().eq_ignore_ascii_case("y"))
    }
}
