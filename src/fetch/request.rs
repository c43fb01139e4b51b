//! Fetch request description and validation.

use reqwest::header::HeaderMap;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

use super::FetchError;
use crate::http::{build_header_map, default_headers, find_user_agent};

/// Per-attempt timeout used when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retries after the first attempt used when none is given.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base backoff used when none is given.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Everything needed to fetch one URL politely.
///
/// Built from browser-like defaults and adjusted with the builder methods:
///
/// ```
/// use polite_scrape::fetch::FetchRequest;
/// use std::time::Duration;
///
/// let request = FetchRequest::new("https://example.com")
///     .user_agent("my-scraper/1.0")
///     .max_retries(5)
///     .min_delay(Duration::from_secs(2));
/// assert_eq!(request.max_retries, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff: Duration,
    /// Minimum gap between consecutive requests sent through one session.
    pub min_delay: Duration,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: default_headers(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
            min_delay: Duration::ZERO,
        }
    }

    /// Same settings, different target.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }

    /// Sets a header, replacing any existing header whose name matches
    /// case-insensitively.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        self.header("User-Agent", user_agent)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    /// Upper bound on requests sent for this request.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Checks the preconditions and returns the parsed URL and header map.
    pub(crate) fn prepare(&self) -> Result<(Url, HeaderMap), FetchError> {
        let url = Url::parse(&self.url)
            .map_err(|e| FetchError::invalid_request(format!("{:?}: {}", self.url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::invalid_request(format!(
                "unsupported URL scheme {:?} in {}",
                url.scheme(),
                url
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(FetchError::invalid_request(format!("URL has no host: {}", url)));
        }

        if self.timeout.is_zero() {
            return Err(FetchError::invalid_request("timeout must be positive"));
        }
        if self.backoff.is_zero() {
            return Err(FetchError::invalid_request("backoff must be positive"));
        }

        match find_user_agent(&self.headers) {
            Some(agent) if !agent.trim().is_empty() => {}
            _ => {
                return Err(FetchError::invalid_request(
                    "a non-empty User-Agent header is required",
                ));
            }
        }

        let headers = build_header_map(&self.headers).map_err(FetchError::invalid_request)?;
        Ok((url, headers))
    }
}
