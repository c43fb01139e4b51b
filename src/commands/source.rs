use anyhow::{Context, Result, anyhow};
use log::debug;
use scraper::Html;
use std::path::{Path, PathBuf};
use url::Url;

use super::config::Config;
use crate::{extract::parse_document, runtime::Runtime};

/// Where a command reads its HTML from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    Url(String),
    File(PathBuf),
}

/// HTML loaded from a [`PageSource`], with the URL relative links resolve against.
#[derive(Debug, Clone)]
pub struct Page {
    pub html: String,
    pub base: Url,
}

impl Page {
    pub fn document(&self) -> Html {
        parse_document(self.html.as_bytes())
    }
}

impl<R: Runtime> Config<R> {
    /// Fetches or reads the page behind `source`.
    #[tracing::instrument(skip(self))]
    pub async fn load_page(&mut self, source: &PageSource) -> Result<Page> {
        match source {
            PageSource::Url(url) => {
                let response = self.fetch(url).await?;
                Ok(Page {
                    html: response.text(),
                    base: response.final_url,
                })
            }
            PageSource::File(path) => {
                debug!("Reading HTML from {:?}", path);
                let html = self.runtime().read_to_string(path)?;
                Ok(Page {
                    html,
                    base: file_url(path)?,
                })
            }
        }
    }
}

fn file_url(path: &Path) -> Result<Url> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve path {:?}", path))?;
    Url::from_file_path(&absolute)
        .map_err(|_| anyhow!("Cannot turn {:?} into a file URL", absolute))
}
