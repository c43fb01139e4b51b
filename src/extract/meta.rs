//! Page metadata from `<title>` and `<meta>` tags.

use anyhow::Result;
use scraper::Html;
use serde::Serialize;

use super::{css, extract_title};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub author: Option<String>,
}

impl Metadata {
    /// Present fields as `(label, value)` pairs, in display order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Title", &self.title),
            ("Description", &self.description),
            ("Keywords", &self.keywords),
            ("Author", &self.author),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

/// Reads title, description (`name="description"` or `og:description`),
/// keywords and author. Later tags win over earlier ones.
pub fn extract_metadata(document: &Html) -> Result<Metadata> {
    let mut metadata = Metadata {
        title: extract_title(document)?,
        ..Metadata::default()
    };

    for tag in document.select(&css("meta")?) {
        let element = tag.value();
        let name = element.attr("name").unwrap_or("").to_lowercase();
        let property = element.attr("property").unwrap_or("").to_lowercase();
        let content = element.attr("content").unwrap_or("").to_string();

        if name == "description" || property == "og:description" {
            metadata.description = Some(content);
        } else if name == "keywords" {
            metadata.keywords = Some(content);
        } else if name == "author" {
            metadata.author = Some(content);
        }
    }

    Ok(metadata)
}
