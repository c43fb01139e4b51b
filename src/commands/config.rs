use anyhow::{Context, Result};
use log::{debug, warn};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::{
    fetch::{FetchError, FetchRequest, FetchResponse, FetchSession, PoliteFetcher},
    runtime::Runtime,
};

/// Fetch settings shared by every command, usually taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub user_agent: Option<String>,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
    pub delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            headers: Vec::new(),
            timeout: Duration::from_secs(10),
            retries: 3,
            backoff: Duration::from_secs(1),
            delay: Duration::from_secs(1),
        }
    }
}

impl FetchOptions {
    /// A request with these settings and no URL yet.
    pub fn request_template(&self) -> FetchRequest {
        let mut request = FetchRequest::new("")
            .timeout(self.timeout)
            .max_retries(self.retries)
            .backoff(self.backoff)
            .min_delay(self.delay);

        if let Some(agent) = &self.user_agent {
            request = request.user_agent(agent);
        }
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        request
    }
}

/// Parses `NAME:VALUE` into a header pair.
pub fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {:?}", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Parses a non-negative number of seconds, fractions allowed.
pub fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid number of seconds {:?}: {}", s, e))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration {:?}: {}", s, e))
}

/// A fetcher, the session it drives, and the request template for new URLs.
pub struct Config<R: Runtime> {
    pub fetcher: PoliteFetcher<R>,
    pub session: FetchSession,
    pub template: FetchRequest,
}

impl<R: Runtime> Config<R> {
    pub fn new(runtime: R, options: &FetchOptions) -> Result<Self> {
        let template = options.request_template();
        debug!(
            "Fetch settings: timeout {:?}, {} retries, backoff {:?}, delay {:?}",
            template.timeout, template.max_retries, template.backoff, template.min_delay
        );

        Ok(Self {
            fetcher: PoliteFetcher::new(runtime),
            session: FetchSession::new()?,
            template,
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.fetcher = self.fetcher.with_cancellation(token);
        self
    }

    pub fn runtime(&self) -> &R {
        self.fetcher.runtime()
    }

    pub fn request(&self, url: &str) -> FetchRequest {
        self.template.with_url(url)
    }

    /// Fetches `url` through the shared session.
    ///
    /// A terminal failure is logged with its kind and attempt count and
    /// returned as an error carrying the [`FetchError`].
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&mut self, url: &str) -> Result<FetchResponse> {
        let request = self.request(url);
        match self.fetcher.fetch(&mut self.session, &request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                log_failure(url, &e);
                Err(e).with_context(|| format!("Failed to fetch {}", url))
            }
        }
    }
}

fn log_failure(url: &str, error: &FetchError) {
    warn!(
        "Fetching {} failed: {} after {} attempt(s): {}",
        url, error.kind, error.attempts, error.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchErrorKind;
    use crate::http::find_user_agent;
    use crate::runtime::RealRuntime;
    use mockito::{Matcher, Server};

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("X-Api-Key: secret").unwrap(),
            ("X-Api-Key".to_string(), "secret".to_string())
        );
        assert_eq!(
            parse_header("Referer:https://a.example/x").unwrap(),
            ("Referer".to_string(), "https://a.example/x".to_string())
        );
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("2").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_seconds("0.25").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_seconds("0").unwrap(), Duration::ZERO);
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("NaN").is_err());
        assert!(parse_seconds("soon").is_err());
    }

    #[test]
    fn test_request_template_applies_options() {
        let options = FetchOptions {
            user_agent: Some("field-notes/0.1".to_string()),
            headers: vec![("Accept-Language".to_string(), "de".to_string())],
            timeout: Duration::from_secs(3),
            retries: 5,
            backoff: Duration::from_millis(200),
            delay: Duration::from_secs(2),
        };

        let template = options.request_template();
        assert_eq!(find_user_agent(&template.headers), Some("field-notes/0.1"));
        assert_eq!(template.headers["Accept-Language"], "de");
        assert_eq!(template.timeout, Duration::from_secs(3));
        assert_eq!(template.max_retries, 5);
        assert_eq!(template.backoff, Duration::from_millis(200));
        assert_eq!(template.min_delay, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_config_sends_configured_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", "field-notes/0.1")
            .match_header("x-extra", Matcher::Exact("1".to_string()))
            .with_status(200)
            .create_async()
            .await;

        let options = FetchOptions {
            user_agent: Some("field-notes/0.1".to_string()),
            headers: vec![("X-Extra".to_string(), "1".to_string())],
            delay: Duration::ZERO,
            ..FetchOptions::default()
        };
        let mut config = Config::new(RealRuntime, &options).unwrap();

        let response = config.fetch(&format!("{}/", server.url())).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_config_fetch_failure_keeps_fetch_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/gone")
            .with_status(410)
            .create_async()
            .await;

        let options = FetchOptions {
            delay: Duration::ZERO,
            ..FetchOptions::default()
        };
        let mut config = Config::new(RealRuntime, &options).unwrap();

        let err = config
            .fetch(&format!("{}/gone", server.url()))
            .await
            .unwrap_err();

        let fetch_err = err.downcast_ref::<FetchError>().unwrap();
        assert_eq!(fetch_err.kind, FetchErrorKind::ClientError);
        assert_eq!(fetch_err.status, Some(410));
        assert!(err.to_string().contains("Failed to fetch"));
    }
}
