use crate::export::{render_document, ResultPage};
use crate::parser;
use crate::Result;
use anyhow::Context;
use chrono::Local;
use colored::Colorize;
use std::io::{self, Read};
use std::path::Path;

/// Convert a Markdown file (or stdin) to an HTML fragment or full page
pub fn run(
    input: Option<&Path>,
    document: bool,
    title: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let content = read_input(input)?;

    let html = if document {
        let fallback = input
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("Document");
        render_document(&ResultPage {
            title: title.unwrap_or(fallback),
            url: "",
            content: &content,
            saved_at: Local::now().naive_local(),
        })
    } else {
        parser::convert(&content)
    };

    match output {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{}", format!("✓ Wrote {}", path.display()).green());
        }
        None => println!("{}", html),
    }

    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
