//! Reusable connection, cookie and pacing state.

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Connection pool, cookie jar and pacing bookkeeping for one caller.
///
/// `PoliteFetcher::fetch` takes the session by `&mut`, so requests through one
/// session are always serialised. Use one session per worker to fetch in
/// parallel.
pub struct FetchSession {
    client: Client,
    cookies: Arc<Jar>,
    last_request: Option<Instant>,
}

impl FetchSession {
    /// Creates a session with a fresh connection pool and cookie jar.
    pub fn new() -> Result<Self> {
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            cookies,
            last_request: None,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// When the last request through this session was sent, if any.
    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// Cookies the session currently holds for `url`, as `(name, value)` pairs.
    pub fn cookies(&self, url: &Url) -> Vec<(String, String)> {
        let Some(header) = self.cookies.cookies(url) else {
            return Vec::new();
        };
        let Ok(header) = header.to_str() else {
            return Vec::new();
        };

        header
            .split("; ")
            .filter_map(|pair| pair.split_once('='))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    /// Time still to wait at `now` before the next request honours `min_delay`.
    pub fn pacing_wait(&self, now: Instant, min_delay: Duration) -> Duration {
        match self.last_request {
            Some(last) => min_delay.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Records that a request is about to be sent at `now`.
    ///
    /// Never moves the timestamp backwards.
    pub(crate) fn mark_sent(&mut self, now: Instant) {
        self.last_request = Some(match self.last_request {
            Some(last) => last.max(now),
            None => now,
        });
    }
}
