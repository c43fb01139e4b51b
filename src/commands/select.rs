use anyhow::Result;

use super::config::Config;
use super::source::PageSource;
use crate::{
    extract::{select_attr, select_text},
    runtime::Runtime,
};

/// Print the elements matching a CSS selector, or one of their attributes.
#[tracing::instrument(skip(config))]
pub async fn select<R: Runtime>(
    config: &mut Config<R>,
    source: &PageSource,
    selector: &str,
    attr: Option<&str>,
) -> Result<()> {
    let page = config.load_page(source).await?;
    let document = page.document();

    let values = match attr {
        Some(attr) => select_attr(&document, selector, attr)?,
        None => select_text(&document, selector)?,
    };

    for line in match_lines(selector, &values) {
        println!("{}", line);
    }

    Ok(())
}

pub(crate) fn match_lines(selector: &str, values: &[String]) -> Vec<String> {
    let mut lines = vec![format!(
        "Found {} match(es) for {:?}",
        values.len(),
        selector
    )];
    lines.extend(
        values
            .iter()
            .enumerate()
            .map(|(i, value)| format!("  {}. {}", i + 1, value)),
    );
    lines
}
