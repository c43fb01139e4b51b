//! Data extraction from fetched pages.
//!
//! Parsing and selector matching are delegated to the `scraper` crate; these
//! functions only decide what to pull out of the document and how to shape it.

mod links;
mod meta;
mod table;
mod text;

use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Selector};

pub use links::{Image, Link, LinkCategories, categorize_links, extract_images, extract_links};
pub use meta::{Metadata, extract_metadata};
pub use table::{Table, extract_tables};
pub use text::{extract_headings, extract_paragraphs, extract_title, select_attr, select_text};

/// Parses an HTML body, replacing invalid UTF-8.
pub fn parse_document(body: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(body))
}

/// Compiles a CSS selector, reporting the offending input on failure.
pub(crate) fn css(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid CSS selector {:?}: {}", selector, e))
}

/// All text below `element`, trimmed.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
