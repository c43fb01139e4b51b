use anyhow::Result;
use log::info;

use super::config::Config;
use crate::{
    extract::{extract_title, parse_document},
    fetch::{FetchError, FetchErrorKind},
    runtime::Runtime,
};

/// Fetch several URLs through one session, honouring the pacing floor, and
/// print each page's title. Failed pages are reported and skipped; a
/// cancelled fetch stops the crawl with an error.
///
/// Returns the number of pages fetched successfully.
#[tracing::instrument(skip(config, urls))]
pub async fn crawl<R: Runtime>(config: &mut Config<R>, urls: &[String]) -> Result<usize> {
    let total = urls.len();
    let mut fetched = 0;

    for (i, url) in urls.iter().enumerate() {
        println!("Scraping URL {}/{}: {}", i + 1, total, url);

        match config.fetch(url).await {
            Ok(response) => {
                fetched += 1;
                let document = parse_document(&response.body);
                let title = extract_title(&document)?;
                println!("  Title: {}", title.as_deref().unwrap_or("(none)"));
            }
            Err(e) => {
                let Some(fetch_err) = e.downcast_ref::<FetchError>() else {
                    return Err(e);
                };
                if fetch_err.kind == FetchErrorKind::Cancelled {
                    info!("Crawl cancelled after {}/{} page(s)", fetched, total);
                    return Err(e);
                }
                println!(
                    "  Failed: {} after {} attempt(s)",
                    fetch_err.kind, fetch_err.attempts
                );
            }
        }
    }

    info!("Crawl finished: {}/{} page(s) fetched", fetched, total);
    println!("Fetched {}/{} page(s)", fetched, total);
    Ok(fetched)
}
