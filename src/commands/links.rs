use anyhow::Result;

use super::config::Config;
use super::source::PageSource;
use crate::{
    extract::{Image, Link, categorize_links, extract_images, extract_links},
    runtime::Runtime,
};

/// Print every link and image on a page with absolute URLs.
#[tracing::instrument(skip(config))]
pub async fn links<R: Runtime>(config: &mut Config<R>, source: &PageSource) -> Result<()> {
    let page = config.load_page(source).await?;
    let document = page.document();

    let links = extract_links(&document, &page.base)?;
    print_links(&links);

    if !links.is_empty() {
        let categories = categorize_links(&links, &page.base);
        println!();
        println!("Internal Links: {}", categories.internal.len());
        println!("External Links: {}", categories.external.len());
    }

    let images = extract_images(&document, &page.base)?;
    println!();
    print_images(&images);

    Ok(())
}

pub(crate) fn print_links(links: &[Link]) {
    println!("Total Links Found: {}", links.len());
    for (i, link) in links.iter().enumerate() {
        let text = if link.text.is_empty() {
            "No text"
        } else {
            link.text.as_str()
        };
        println!("  {}. {} -> {}", i + 1, text, link.url);
    }
}

pub(crate) fn print_images(images: &[Image]) {
    println!("Total Images Found: {}", images.len());
    for (i, image) in images.iter().enumerate() {
        println!("  {}. Source: {}", i + 1, image.src);
        println!("     Alt: {}", image.alt.as_deref().unwrap_or("No alt text"));
        if let Some(title) = &image.title {
            println!("     Title: {}", title);
        }
    }
}
