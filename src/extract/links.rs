//! Links and images, resolved against the page URL.

use anyhow::Result;
use log::debug;
use scraper::Html;
use serde::Serialize;
use url::Url;

use super::{css, element_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Anchor text; empty when the anchor has none.
    pub text: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub src: Url,
    pub alt: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkCategories {
    pub internal: Vec<Link>,
    pub external: Vec<Link>,
}

/// Every `<a href>` with its target made absolute against `base`.
///
/// Anchors whose href cannot be resolved are skipped.
pub fn extract_links(document: &Html, base: &Url) -> Result<Vec<Link>> {
    let mut links = Vec::new();
    for anchor in document.select(&css("a[href]")?) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        match base.join(href) {
            Ok(url) => links.push(Link {
                text: element_text(&anchor),
                url,
            }),
            Err(e) => debug!("Skipping unresolvable link {:?}: {}", href, e),
        }
    }
    Ok(links)
}

/// Every `<img src>` with its source made absolute against `base`.
pub fn extract_images(document: &Html, base: &Url) -> Result<Vec<Image>> {
    let mut images = Vec::new();
    for img in document.select(&css("img[src]")?) {
        let element = img.value();
        let Some(src) = element.attr("src") else {
            continue;
        };
        match base.join(src) {
            Ok(src) => images.push(Image {
                src,
                alt: element.attr("alt").map(str::to_string),
                title: element.attr("title").map(str::to_string),
            }),
            Err(e) => debug!("Skipping unresolvable image {:?}: {}", src, e),
        }
    }
    Ok(images)
}

/// Splits links into those on the same host as `base` and everything else.
pub fn categorize_links(links: &[Link], base: &Url) -> LinkCategories {
    let mut categories = LinkCategories::default();
    for link in links {
        if link.url.host_str() == base.host_str() {
            categories.internal.push(link.clone());
        } else {
            categories.external.push(link.clone());
        }
    }
    categories
}
