use std::collections::BTreeMap;

use http::HeaderMap;

/// CGI-style signal names consulted during resolution.
pub mod keys {
    pub const FORWARDED_PROTO: &str = "HTTP_X_FORWARDED_PROTO";
    pub const REQUEST_SCHEME: &str = "REQUEST_SCHEME";
    pub const HTTPS: &str = "HTTPS";

    pub const FORWARDED_HOST: &str = "HTTP_X_FORWARDED_HOST";
    pub const HOST: &str = "HTTP_HOST";
    pub const SERVER_NAME: &str = "SERVER_NAME";

    pub const FORWARDED_FOR: &str = "HTTP_X_FORWARDED_FOR";
    pub const CLIENT_IP: &str = "HTTP_CLIENT_IP";
    pub const REMOTE_ADDR: &str = "REMOTE_ADDR";

    pub const FORWARDED_PORT: &str = "HTTP_X_FORWARDED_PORT";
    pub const SERVER_PORT: &str = "SERVER_PORT";

    pub const USER_AGENT: &str = "HTTP_USER_AGENT";
    pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
    pub const REQUEST_URI: &str = "REQUEST_URI";
    pub const SCRIPT_NAME: &str = "SCRIPT_NAME";
    pub const SCRIPT_FILENAME: &str = "SCRIPT_FILENAME";
    pub const SERVER_SOFTWARE: &str = "SERVER_SOFTWARE";
}

/// Named string signals describing one inbound request.
///
/// Keys follow CGI naming: request headers appear as `HTTP_<NAME>` with
/// dashes turned into underscores, connection metadata keeps its CGI name
/// (`REMOTE_ADDR`, `SERVER_PORT`, ...). A `Signals` value is read-only input
/// to the resolvers; build a new one to observe a different request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signals {
    inner: BTreeMap<String, String>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the current process environment, as seen by a CGI script or
    /// a command-line invocation. Variables that are not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Builds signals from request headers only.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut signals = Self::new();
        signals.extend_headers(headers);
        signals
    }

    /// Adds every header as an `HTTP_*` signal. Repeated headers are joined
    /// with `", "`; values that are not visible ASCII are skipped.
    pub fn extend_headers(&mut self, headers: &HeaderMap) {
        for name in headers.keys() {
            let values = headers
                .get_all(name)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .collect::<Vec<_>>();
            if values.is_empty() {
                continue;
            }
            self.insert(header_key(name.as_str()), values.join(", "));
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.inner.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Signals
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let inner = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { inner }
    }
}

/// Maps a header name onto its CGI signal key (`x-forwarded-for` -> `HTTP_X_FORWARDED_FOR`).
pub fn header_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 5);
    key.push_str("HTTP_");
    for ch in name.chars() {
        match ch {
            '-' => key.push('_'),
            other => key.push(other.to_ascii_uppercase()),
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn header_key_uses_cgi_naming() {
        assert_eq!(header_key("x-forwarded-for"), "HTTP_X_FORWARDED_FOR");
        assert_eq!(header_key("Host"), "HTTP_HOST");
        assert_eq!(header_key("user-agent"), keys::USER_AGENT);
    }

    #[test]
    fn from_headers_maps_names_and_joins_repeats() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("example.com"));
        headers.append("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));

        let signals = Signals::from_headers(&headers);
        assert_eq!(signals.get(keys::HOST), Some("example.com"));
        assert_eq!(
            signals.get(keys::FORWARDED_FOR),
            Some("203.0.113.9, 10.0.0.1")
        );
        assert_eq!(signals.len(), 2);
    }

    #[test]
    fn from_headers_skips_opaque_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-binary",
            HeaderValue::from_bytes(b"caf\xe9").expect("header value"),
        );
        let signals = Signals::from_headers(&headers);
        assert!(!signals.contains("HTTP_X_BINARY"));
        assert!(signals.is_empty());
    }

    #[test]
    fn builder_and_removal() {
        let mut signals = Signals::new()
            .with(keys::SERVER_PORT, "8080")
            .with(keys::REMOTE_ADDR, "10.0.0.5");
        assert_eq!(signals.get(keys::SERVER_PORT), Some("8080"));
        assert_eq!(signals.remove(keys::SERVER_PORT).as_deref(), Some("8080"));
        assert!(!signals.contains(keys::SERVER_PORT));
        assert_eq!(signals.iter().count(), 1);
    }

    #[test]
    fn collects_from_pairs() {
        let signals: Signals = [(keys::HTTPS, "on"), (keys::HOST, "a.test")]
            .into_iter()
            .collect();
        assert_eq!(signals.get(keys::HTTPS), Some("on"));
        assert_eq!(signals.get(keys::HOST), Some("a.test"));
    }
}
