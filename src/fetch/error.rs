//! Terminal fetch failures.

use std::fmt;

/// Classification of a failed attempt or a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// Connection refused, DNS failure, timeout (retryable)
    NetworkError,
    /// HTTP 429, 500, 502, 503 or 504 (retryable)
    ServerError,
    /// HTTP 4xx other than 429 (terminal)
    ClientError,
    /// Any other non-2xx status, such as 501 or an unfollowed redirect (terminal)
    UnexpectedStatus,
    /// The retry budget was consumed by retryable failures (terminal)
    RetriesExhausted,
    /// The request failed validation before any I/O (terminal)
    InvalidRequest,
    /// The fetch was cancelled through its cancellation token (terminal)
    Cancelled,
}

impl FetchErrorKind {
    /// Whether a failure of this kind may succeed on another attempt.
    pub fn is_retryable(self) -> bool {
        matches!(self, FetchErrorKind::NetworkError | FetchErrorKind::ServerError)
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchErrorKind::NetworkError => "NetworkError",
            FetchErrorKind::ServerError => "ServerError",
            FetchErrorKind::ClientError => "ClientError",
            FetchErrorKind::UnexpectedStatus => "UnexpectedStatus",
            FetchErrorKind::RetriesExhausted => "RetriesExhausted",
            FetchErrorKind::InvalidRequest => "InvalidRequest",
            FetchErrorKind::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// A terminal failure of one `fetch` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    /// Status of the last response, if the last attempt got one.
    pub status: Option<u16>,
    /// Message of the last underlying error.
    pub message: String,
    /// Number of requests actually sent.
    pub attempts: u32,
    /// For `RetriesExhausted`: what the final attempt failed with.
    pub last_failure: Option<FetchErrorKind>,
}

impl FetchError {
    pub(crate) fn new(kind: FetchErrorKind, message: impl Into<String>, attempts: u32) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            attempts,
            last_failure: None,
        }
    }

    pub(crate) fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::InvalidRequest, message, 0)
    }

    pub(crate) fn cancelled(attempts: u32) -> Self {
        Self::new(FetchErrorKind::Cancelled, "fetch cancelled", attempts)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FetchErrorKind::RetriesExhausted => write!(
                f,
                "Retries exhausted after {} attempt(s): {}",
                self.attempts, self.message
            ),
            FetchErrorKind::ClientError => write!(f, "Client error: {}", self.message),
            FetchErrorKind::InvalidRequest => write!(f, "Invalid request: {}", self.message),
            FetchErrorKind::Cancelled => {
                write!(f, "Fetch cancelled after {} attempt(s)", self.attempts)
            }
            kind => write!(
                f,
                "{} after {} attempt(s): {}",
                kind, self.attempts, self.message
            ),
        }
    }
}

impl std::error::Error for FetchError {}
