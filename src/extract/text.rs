//! Title, headings, paragraphs and free-form CSS selection.

use anyhow::Result;
use scraper::Html;

use super::{css, element_text};

pub fn extract_title(document: &Html) -> Result<Option<String>> {
    Ok(document
        .select(&css("title")?)
        .next()
        .map(|title| element_text(&title)))
}

/// Non-empty headings grouped by level, `h1` through `h6`; levels without any
/// heading are left out.
pub fn extract_headings(document: &Html) -> Result<Vec<(String, Vec<String>)>> {
    let mut headings = Vec::new();
    for level in 1..=6 {
        let tag = format!("h{}", level);
        let texts: Vec<String> = document
            .select(&css(&tag)?)
            .map(|h| element_text(&h))
            .filter(|text| !text.is_empty())
            .collect();
        if !texts.is_empty() {
            headings.push((tag, texts));
        }
    }
    Ok(headings)
}

/// Text of every `<p>` that is not blank.
pub fn extract_paragraphs(document: &Html) -> Result<Vec<String>> {
    Ok(document
        .select(&css("p")?)
        .map(|p| element_text(&p))
        .filter(|text| !text.is_empty())
        .collect())
}

/// Text of every element matching `selector`.
pub fn select_text(document: &Html, selector: &str) -> Result<Vec<String>> {
    Ok(document
        .select(&css(selector)?)
        .map(|element| element_text(&element))
        .collect())
}

/// Value of `attr` on every element matching `selector` that carries it.
pub fn select_attr(document: &Html, selector: &str, attr: &str) -> Result<Vec<String>> {
    Ok(document
        .select(&css(selector)?)
        .filter_map(|element| element.value().attr(attr).map(str::to_string))
        .collect())
}
