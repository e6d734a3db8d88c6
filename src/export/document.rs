//! Standalone HTML page for a saved search result

use crate::parser::{convert, escape_html};
use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

const RESULT_TEMPLATE: &str = include_str!("assets/result.html");

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_]+)\}\}").expect("placeholder pattern is valid"));

/// Everything shown on a saved page
#[derive(Debug, Clone)]
pub struct ResultPage<'a> {
    pub title: &'a str,
    pub url: &'a str,
    /// Markdown-ish body, converted to HTML when rendered
    pub content: &'a str,
    pub saved_at: NaiveDateTime,
}

/// Render a complete HTML document for `page`.
///
/// Title and URL are escaped; the body is the converter fragment. Placeholders
/// are substituted in a single pass so content cannot inject new ones.
pub fn render_document(page: &ResultPage<'_>) -> String {
    let mut values: HashMap<&str, String> = HashMap::new();
    values.insert("TITLE", escape_html(page.title));
    values.insert("URL", escape_html(page.url));
    values.insert("CONTENT_LENGTH", page.content.chars().count().to_string());
    values.insert("BODY", convert(page.content));
    values.insert(
        "SAVED_AT",
        page.saved_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    );

    PLACEHOLDER_RE
        .replace_all(RESULT_TEMPLATE, |caps: &Captures| {
            values
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
