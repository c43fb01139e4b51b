//! HTTP plumbing for the fetcher: outcome classification, backoff timing and
//! header construction.

mod headers;
mod retry;

pub use headers::{DEFAULT_USER_AGENT, build_header_map, default_headers, find_user_agent};
pub use retry::{
    Disposition, RETRYABLE_STATUSES, backoff_delay, classify_error, classify_status,
};
