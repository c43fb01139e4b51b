//! Polite fetching: pacing, retries with exponential backoff, and session
//! reuse on top of reqwest.
//!
//! A [`FetchSession`] owns the connection pool, the cookie jar and the time of
//! the last request sent through it. A [`PoliteFetcher`] drives one
//! [`FetchRequest`] through a session and returns a [`FetchResult`].

mod error;
mod fetcher;
mod request;
mod session;

pub use error::{FetchError, FetchErrorKind};
pub use fetcher::{FetchResponse, FetchResult, PoliteFetcher};
pub use request::FetchRequest;
pub use session::FetchSession;
