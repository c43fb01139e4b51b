use anyhow::Result;
use log::info;
use std::path::Path;

use super::config::Config;
use crate::runtime::Runtime;

/// Fetch a URL and report the response; optionally save the body.
#[tracing::instrument(skip(config))]
pub async fn fetch<R: Runtime>(
    config: &mut Config<R>,
    url: &str,
    output: Option<&Path>,
) -> Result<()> {
    let response = config.fetch(url).await?;

    println!("URL: {}", response.final_url);
    println!("Status: {}", response.status);
    println!(
        "Content-Type: {}",
        response.content_type.as_deref().unwrap_or("(none)")
    );
    println!("Bytes: {}", response.body.len());
    println!("Attempts: {}", response.attempts);

    if let Some(path) = output {
        config.runtime().write(path, &response.body)?;
        info!("Saved body of {} to {:?}", url, path);
        println!("Saved {} bytes to {}", response.body.len(), path.display());
    }

    Ok(())
}
