//! Request header construction.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;

/// Browser-like User-Agent sent when the caller does not choose one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/124.0.0.0 Safari/537.36";

/// Headers a polite scraper sends by default.
pub fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string()),
        (
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        ),
        ("Accept-Language".to_string(), "en-US,en;q=0.5".to_string()),
    ])
}

/// Looks up the User-Agent value, matching the header name case-insensitively.
pub fn find_user_agent(headers: &BTreeMap<String, String>) -> Option<&str> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("user-agent"))
        .map(|(_, value)| value.as_str())
}

/// Converts a string header mapping into a reqwest [`HeaderMap`].
///
/// Fails with a message naming the offending header if a name or value is not
/// valid HTTP.
pub fn build_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, String> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| format!("invalid header name {:?}: {}", name, e))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| format!("invalid value for header {:?}: {}", name, e))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
