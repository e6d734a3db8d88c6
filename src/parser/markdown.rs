//! Minimal Markdown to HTML fragment converter
//!
//! Handles a deliberately small dialect:
//! - Fenced code blocks (a line of exactly three backticks)
//! - Inline code (single backticks, one line)
//! - Headings `#`, `##`, `###`
//! - Horizontal rules (`---`)
//!
//! Everything else becomes one escaped `<p>` per line. The converter never
//! fails; unexpected input degrades to paragraphs.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Matches a fence line, its interior, and the closing fence line (or end of input).
///
/// Fence lines may end in `\r\n`. The line break after the opening fence and
/// the one before the closing fence (or end of input) are absorbed. An
/// unterminated fence runs to the end of the document.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^```\r?$\n?(.*?)(?:\r?\n?^```\r?$|\r?\n?\z)")
        .expect("fence pattern is valid")
});

/// Single-backtick span on one line, no backtick inside
static INLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("inline code pattern is valid"));

static CODEBLOCK_SENTINEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@CODEBLOCK(\d+)@@$").expect("code block sentinel pattern is valid")
});

static INLINE_SENTINEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@@INLINE(\d+)@@").expect("inline sentinel pattern is valid"));

/// Text with extracted spans replaced by sentinels, plus the spans in extraction order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    /// Rewritten text containing sentinel tokens
    pub text: String,
    /// Extracted contents; index `n` belongs to sentinel `n`
    pub spans: Vec<String>,
}

/// Sentinel for the `index`-th fenced block
pub fn codeblock_sentinel(index: usize) -> String {
    format!("@@CODEBLOCK{}@@", index)
}

/// Sentinel for the `index`-th inline code span
pub fn inline_sentinel(index: usize) -> String {
    format!("@@INLINE{}@@", index)
}

/// Replace every fenced code block with a `@@CODEBLOCK{n}@@` sentinel.
///
/// Block contents are returned raw (unescaped).
///
/// # Example
/// ```
/// use tavily_sss::parser::extract_fenced_blocks;
/// let extraction = extract_fenced_blocks("intro\n```\nlet x = 1;\n```\noutro");
/// assert_eq!(extraction.text, "intro\n@@CODEBLOCK0@@\noutro");
/// assert_eq!(extraction.spans, vec!["let x = 1;".to_string()]);
/// ```
pub fn extract_fenced_blocks(text: &str) -> Extraction {
    extract_with(&FENCE_RE, text, codeblock_sentinel)
}

/// Replace every inline code span with an `@@INLINE{n}@@` sentinel.
///
/// Expects text that has already been HTML-escaped, so stored spans are inert.
pub fn extract_inline_code(escaped: &str) -> Extraction {
    extract_with(&INLINE_RE, escaped, inline_sentinel)
}

fn extract_with(re: &Regex, text: &str, sentinel: fn(usize) -> String) -> Extraction {
    let mut spans = Vec::new();
    let rewritten = re.replace_all(text, |caps: &Captures| {
        let index = spans.len();
        spans.push(caps.get(1).map_or("", |m| m.as_str()).to_string());
        sentinel(index)
    });

    Extraction {
        text: rewritten.into_owned(),
        spans,
    }
}

/// HTML-escape `&`, `<`, `>` and both quote characters
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Convert lightweight Markdown into an HTML fragment.
///
/// # Example
/// ```
/// use tavily_sss::parser::convert;
/// assert_eq!(convert("# Title"), "<h1>Title</h1>");
/// assert_eq!(convert("a `b` c"), "<p>a <code>b</code> c</p>");
/// ```
pub fn convert(text: &str) -> String {
    let fences = extract_fenced_blocks(text);
    let escaped = escape_html(&fences.text);
    let inline = extract_inline_code(&escaped);

    let mut out_lines: Vec<String> = Vec::new();

    for line in inline.text.lines() {
        if let Some(block) = lookup_codeblock(line, &fences.spans) {
            out_lines.push(format!("<pre><code>{}</code></pre>", escape_html(block)));
        } else if let Some(rest) = line.strip_prefix("# ") {
            out_lines.push(format!("<h1>{}</h1>", restore_inline(rest.trim(), &inline.spans)));
        } else if let Some(rest) = line.strip_prefix("## ") {
            out_lines.push(format!("<h2>{}</h2>", restore_inline(rest.trim(), &inline.spans)));
        } else if let Some(rest) = line.strip_prefix("### ") {
            out_lines.push(format!("<h3>{}</h3>", restore_inline(rest.trim(), &inline.spans)));
        } else if line.trim() == "---" {
            out_lines.push("<hr/>".to_string());
        } else if line.trim().is_empty() {
            out_lines.push(String::new());
        } else {
            out_lines.push(format!("<p>{}</p>", restore_inline(line, &inline.spans)));
        }
    }

    out_lines.join("\n")
}

/// Resolve a line that consists solely of a fenced-block sentinel
fn lookup_codeblock<'a>(line: &str, blocks: &'a [String]) -> Option<&'a str> {
    let caps = CODEBLOCK_SENTINEL_RE.captures(line)?;
    let index: usize = caps[1].parse().ok()?;
    blocks.get(index).map(String::as_str)
}

/// Swap inline sentinels back for `<code>` elements; unknown indices stay literal
fn restore_inline(line: &str, spans: &[String]) -> String {
    INLINE_SENTINEL_RE
        .replace_all(line, |caps: &Captures| {
            let span = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| spans.get(index));
            match span {
                Some(code) => format!("<code>{}</code>", code),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
