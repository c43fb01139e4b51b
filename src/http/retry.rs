//! Retry classification for network operations.
//!
//! Every outcome of a single GET attempt is sorted into a [`Disposition`]:
//! done, worth another attempt, or terminal.

use reqwest::StatusCode;
use std::time::Duration;

use crate::fetch::FetchErrorKind;

/// Status codes that are retried with backoff.
pub const RETRYABLE_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// What the retry loop should do with the outcome of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 2xx response
    Success,
    /// Transient failure; retry if budget remains
    Retry(FetchErrorKind),
    /// Terminal failure; never retried
    Fail(FetchErrorKind),
}

/// Classifies an HTTP status code.
pub fn classify_status(status: StatusCode) -> Disposition {
    if status.is_success() {
        return Disposition::Success;
    }

    if RETRYABLE_STATUSES.contains(&status) {
        return Disposition::Retry(FetchErrorKind::ServerError);
    }

    if status.is_client_error() {
        return Disposition::Fail(FetchErrorKind::ClientError);
    }

    // 3xx that the client did not follow, 501, 505, ...
    Disposition::Fail(FetchErrorKind::UnexpectedStatus)
}

/// Classifies a transport-level error returned by reqwest.
pub fn classify_error(error: &reqwest::Error) -> Disposition {
    if let Some(status) = error.status() {
        return classify_status(status);
    }

    if error.is_builder() {
        return Disposition::Fail(FetchErrorKind::InvalidRequest);
    }

    if error.is_redirect() {
        return Disposition::Fail(FetchErrorKind::UnexpectedStatus);
    }

    // Connection refused, DNS failure, timeout, reset while reading the body, ...
    Disposition::Retry(FetchErrorKind::NetworkError)
}

/// Backoff slept before retry number `attempt` (1-based): `base * 2^(attempt - 1)`.
///
/// Saturates at `Duration::MAX` instead of overflowing.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    1u32.checked_shl(exponent)
        .and_then(|factor| base.checked_mul(factor))
        .unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_success() {
        assert_eq!(classify_status(StatusCode::OK), Disposition::Success);
        assert_eq!(classify_status(StatusCode::NO_CONTENT), Disposition::Success);
    }

    #[test]
    fn test_classify_status_retryable() {
        for status in RETRYABLE_STATUSES {
            assert_eq!(
                classify_status(status),
                Disposition::Retry(FetchErrorKind::ServerError),
                "{} should be retried",
                status
            );
        }
    }

    #[test]
    fn test_classify_status_client_errors_are_terminal() {
        for code in [400, 401, 403, 404, 410, 418] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(
                classify_status(status),
                Disposition::Fail(FetchErrorKind::ClientError),
                "{} should not be retried",
                code
            );
        }
    }

    #[test]
    fn test_classify_status_other_server_errors_are_unexpected() {
        assert_eq!(
            classify_status(StatusCode::NOT_IMPLEMENTED),
            Disposition::Fail(FetchErrorKind::UnexpectedStatus)
        );
        assert_eq!(
            classify_status(StatusCode::NOT_MODIFIED),
            Disposition::Fail(FetchErrorKind::UnexpectedStatus)
        );
    }

    #[test]
    fn test_backoff_delay_doubles() {
        let base = Duration::from_secs(1);
        assert_eq!(backoff_delay(base, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(base, 2), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(4));
        assert_eq!(backoff_delay(base, 4), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_delay_strictly_increasing() {
        let base = Duration::from_millis(250);
        let delays: Vec<_> = (1..=10).map(|k| backoff_delay(base, k)).collect();
        assert!(delays.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_backoff_delay_saturates() {
        assert_eq!(backoff_delay(Duration::from_secs(1), 40), Duration::MAX);
        assert_eq!(backoff_delay(Duration::MAX, 2), Duration::MAX);
    }

    #[tokio::test]
    async fn test_classify_error_connection_refused_is_retryable() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = reqwest::Client::new();
        let err = client
            .get(format!("http://{}/", addr))
            .send()
            .await
            .unwrap_err();

        assert_eq!(
            classify_error(&err),
            Disposition::Retry(FetchErrorKind::NetworkError)
        );
    }

    #[tokio::test]
    async fn test_classify_error_timeout_is_retryable() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = reqwest::Client::new();
        let err = client
            .get(format!("http://{}/", addr))
            .timeout(Duration::from_millis(100))
            .send()
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(
            classify_error(&err),
            Disposition::Retry(FetchErrorKind::NetworkError)
        );
    }

    #[tokio::test]
    async fn test_classify_error_from_error_for_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(404)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let response = client.get(server.url()).send().await.unwrap();
        let err = response.error_for_status().unwrap_err();

        assert_eq!(
            classify_error(&err),
            Disposition::Fail(FetchErrorKind::ClientError)
        );
    }

    #[tokio::test]
    async fn test_classify_error_server_error_from_error_for_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(503)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let response = client.get(server.url()).send().await.unwrap();
        let err = response.error_for_status().unwrap_err();

        assert_eq!(
            classify_error(&err),
            Disposition::Retry(FetchErrorKind::ServerError)
        );
    }
}
