//! Saving search results as HTML pages

pub mod document;

use crate::models::{OutputConfig, SearchResult};
use anyhow::Context;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub use document::{render_document, ResultPage};

/// Outcome of saving a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    pub path: PathBuf,
    /// Whether the page was handed to the browser
    pub opened: bool,
}

/// Writes result pages into a directory and optionally opens them
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    directory: PathBuf,
    open_browser: bool,
}

impl HtmlExporter {
    pub fn new(config: &OutputConfig) -> Self {
        Self::with_directory(&config.directory, config.open_browser)
    }

    pub fn with_directory(directory: impl Into<PathBuf>, open_browser: bool) -> Self {
        Self {
            directory: directory.into(),
            open_browser,
        }
    }

    /// Save `result` stamped with the current local time
    pub fn save(&self, result: &SearchResult) -> anyhow::Result<SavedPage> {
        self.save_at(result, Local::now())
    }

    /// Save `result` as `result_YYYYmmdd_HHMMSS.html`
    pub fn save_at(&self, result: &SearchResult, now: DateTime<Local>) -> anyhow::Result<SavedPage> {
        fs::create_dir_all(&self.directory).with_context(|| {
            format!("Failed to create directory {}", self.directory.display())
        })?;

        let stem = format!("result_{}", now.format("%Y%m%d_%H%M%S"));
        let path = self.unique_path(&stem);

        let html = render_document(&ResultPage {
            title: &result.title,
            url: &result.url,
            content: result.full_content(),
            saved_at: now.naive_local(),
        });

        fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
        let path = fs::canonicalize(&path).unwrap_or(path);
        debug!(path = %path.display(), "saved result page");

        let opened = self.open_browser && open_in_browser(&path);
        Ok(SavedPage { path, opened })
    }

    /// First free path for `stem`, adding `_1`, `_2`, ... on collision
    fn unique_path(&self, stem: &str) -> PathBuf {
        let candidate = self.directory.join(format!("{}.html", stem));
        if !candidate.exists() {
            return candidate;
        }

        (1..)
            .map(|n| self.directory.join(format!("{}_{}.html", stem, n)))
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

fn open_in_browser(path: &Path) -> bool {
    match open::that(path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to open browser");
            false
        }
    }
}
