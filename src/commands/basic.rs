use anyhow::Result;
use scraper::Html;

use super::config::Config;
use super::source::PageSource;
use crate::{
    extract::{extract_headings, extract_paragraphs, extract_title},
    runtime::Runtime,
};

/// Print the title, headings and paragraphs of a page.
#[tracing::instrument(skip(config))]
pub async fn basic<R: Runtime>(config: &mut Config<R>, source: &PageSource) -> Result<()> {
    let page = config.load_page(source).await?;
    for line in summary_lines(&page.document())? {
        println!("{}", line);
    }
    Ok(())
}

pub(crate) fn summary_lines(document: &Html) -> Result<Vec<String>> {
    let title = extract_title(document)?;
    let mut lines = vec![
        format!("Page Title: {}", title.as_deref().unwrap_or("(none)")),
        String::new(),
        "Headings:".to_string(),
    ];
    for (level, texts) in extract_headings(document)? {
        lines.push(format!("  {}: {}", level, texts.join(" | ")));
    }
    lines.push(String::new());

    let paragraphs = extract_paragraphs(document)?;
    lines.push(format!("Found {} paragraph(s)", paragraphs.len()));
    if let Some(first) = paragraphs.first() {
        lines.push("First paragraph:".to_string());
        lines.push(format!("  {}", first));
    }
    Ok(lines)
}
