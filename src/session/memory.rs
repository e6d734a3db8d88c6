//! In-memory console backends, for scripted sessions and tests

use super::{InputSource, OutputSink};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Collects everything appended to it
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Mutex<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended so far
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .map(|b| b.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl OutputSink for MemorySink {
    fn append(&self, text: &str) {
        let mut buffer = self
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buffer.push_str(text);
    }
}

/// Replays a fixed list of lines, then reports closed input
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}
