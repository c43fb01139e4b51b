//! The polite fetch loop.

use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{FetchError, FetchErrorKind, FetchRequest, FetchSession};
use crate::http::{Disposition, backoff_delay, classify_error, classify_status};
use crate::runtime::Runtime;

/// A successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// URL that was requested.
    pub url: Url,
    /// URL after redirects.
    pub final_url: Url,
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    /// Number of requests sent, including the successful one.
    pub attempts: u32,
}

impl FetchResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub type FetchResult = Result<FetchResponse, FetchError>;

/// Where one `fetch` call currently is.
#[derive(Debug)]
enum FetchState {
    /// Nothing sent yet; the pacing floor still applies.
    Idle,
    /// About to send attempt number `attempts + 1`.
    Sending,
    /// Attempt failed transiently; wait `delay` before sending again.
    Backoff { delay: Duration },
}

/// Result of a single attempt.
enum Attempt {
    Success(FetchResponse),
    Retryable {
        kind: FetchErrorKind,
        status: Option<u16>,
        message: String,
    },
    Terminal {
        kind: FetchErrorKind,
        status: Option<u16>,
        message: String,
    },
}

/// Sends GET requests with a pacing floor, exponential backoff and a bounded
/// retry budget.
pub struct PoliteFetcher<R: Runtime> {
    runtime: R,
    cancel: Option<CancellationToken>,
}

impl<R: Runtime> PoliteFetcher<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            cancel: None,
        }
    }

    /// Aborts in-flight fetches once `token` is cancelled. Checked before the
    /// pacing sleep, before each attempt, and during each backoff sleep.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Fetches `request.url` through `session`.
    ///
    /// Retryable failures (network errors, HTTP 429/500/502/503/504) are
    /// absorbed until `request.max_retries` retries are used up; only the
    /// final outcome is returned.
    #[tracing::instrument(skip(self, session, request), fields(url = %request.url))]
    pub async fn fetch(&self, session: &mut FetchSession, request: &FetchRequest) -> FetchResult {
        let (url, headers) = request.prepare()?;

        let mut attempts: u32 = 0;
        let mut state = FetchState::Idle;

        loop {
            state = match state {
                FetchState::Idle => {
                    self.check_cancelled(attempts)?;
                    let wait = session.pacing_wait(self.runtime.now(), request.min_delay);
                    if !wait.is_zero() {
                        debug!("Pacing: waiting {:?} before requesting {}", wait, url);
                        self.sleep_or_cancel(wait, attempts).await?;
                    }
                    FetchState::Sending
                }
                FetchState::Sending => {
                    self.check_cancelled(attempts)?;
                    session.mark_sent(self.runtime.now());
                    attempts += 1;
                    debug!(
                        "GET {} (attempt {}/{})",
                        url,
                        attempts,
                        request.max_attempts()
                    );

                    match send_once(session, &url, &headers, request.timeout, attempts).await {
                        Attempt::Success(response) => {
                            debug!(
                                "GET {} -> {} ({} bytes)",
                                url,
                                response.status,
                                response.body.len()
                            );
                            return Ok(response);
                        }
                        Attempt::Terminal {
                            kind,
                            status,
                            message,
                        } => {
                            debug!("GET {}: non-retryable {}: {}", url, kind, message);
                            return Err(
                                FetchError::new(kind, message, attempts).with_status(status)
                            );
                        }
                        Attempt::Retryable {
                            kind,
                            status,
                            message,
                        } => {
                            if attempts > request.max_retries {
                                warn!(
                                    "GET {}: giving up after {} attempt(s) ({})",
                                    url, attempts, message
                                );
                                let mut error = FetchError::new(
                                    FetchErrorKind::RetriesExhausted,
                                    message,
                                    attempts,
                                )
                                .with_status(status);
                                error.last_failure = Some(kind);
                                return Err(error);
                            }

                            let delay = backoff_delay(request.backoff, attempts);
                            warn!(
                                "GET {}: attempt {}/{} failed ({}), retrying in {:?}...",
                                url,
                                attempts,
                                request.max_attempts(),
                                message,
                                delay
                            );
                            FetchState::Backoff { delay }
                        }
                    }
                }
                FetchState::Backoff { delay } => {
                    self.sleep_or_cancel(delay, attempts).await?;
                    FetchState::Sending
                }
            };
        }
    }

    fn check_cancelled(&self, attempts: u32) -> Result<(), FetchError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(FetchError::cancelled(attempts)),
            _ => Ok(()),
        }
    }

    async fn sleep_or_cancel(&self, duration: Duration, attempts: u32) -> Result<(), FetchError> {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    _ = self.runtime.sleep(duration) => Ok(()),
                    _ = token.cancelled() => Err(FetchError::cancelled(attempts)),
                }
            }
            None => {
                self.runtime.sleep(duration).await;
                Ok(())
            }
        }
    }
}

/// Sends one GET and classifies the outcome.
async fn send_once(
    session: &FetchSession,
    url: &Url,
    headers: &HeaderMap,
    timeout: Duration,
    attempts: u32,
) -> Attempt {
    let response = match session
        .client()
        .get(url.clone())
        .headers(headers.clone())
        .timeout(timeout)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return error_attempt(&e),
    };

    let status = response.status();
    match classify_status(status) {
        Disposition::Success => {
            let final_url = response.url().clone();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            match response.bytes().await {
                Ok(body) => Attempt::Success(FetchResponse {
                    url: url.clone(),
                    final_url,
                    status: status.as_u16(),
                    body: body.to_vec(),
                    content_type,
                    attempts,
                }),
                Err(e) => error_attempt(&e),
            }
        }
        Disposition::Retry(kind) => Attempt::Retryable {
            kind,
            status: Some(status.as_u16()),
            message: format!("HTTP {}", status),
        },
        Disposition::Fail(kind) => Attempt::Terminal {
            kind,
            status: Some(status.as_u16()),
            message: format!("HTTP {}", status),
        },
    }
}

fn error_attempt(error: &reqwest::Error) -> Attempt {
    let status = error.status().map(|s| s.as_u16());
    let message = error.to_string();
    match classify_error(error) {
        Disposition::Retry(kind) => Attempt::Retryable {
            kind,
            status,
            message,
        },
        Disposition::Fail(kind) => Attempt::Terminal {
            kind,
            status,
            message,
        },
        // An error never carries a 2xx status
        Disposition::Success => Attempt::Retryable {
            kind: FetchErrorKind::NetworkError,
            status,
            message,
        },
    }
}
