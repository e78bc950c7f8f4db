use std::net::SocketAddr;

use axum::extract::connect_info::ConnectInfo;
use axum::http::request::Parts;
use axum::http::Request;
use http::{Extensions, HeaderMap, Method, Uri};
use vantage_core::signals::{keys, Signals};

/// Connection facts an axum request does not carry on its own.
#[derive(Clone, Debug)]
pub struct SignalSource {
    /// Reported as `SCRIPT_NAME`, e.g. `/blog/index.php` for an app mounted below `/blog`.
    pub script_name: Option<String>,
    /// Locally bound address; feeds `SERVER_PORT` and `SERVER_NAME`.
    pub local_addr: Option<SocketAddr>,
    pub server_software: Option<String>,
}

impl Default for SignalSource {
    fn default() -> Self {
        Self {
            script_name: None,
            local_addr: None,
            server_software: Some(concat!("vantage/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl SignalSource {
    #[must_use]
    pub fn with_script_name(mut self, script_name: impl Into<String>) -> Self {
        self.script_name = Some(script_name.into());
        self
    }

    #[must_use]
    pub fn with_local_addr(mut self, addr: SocketAddr) -> Self {
        self.local_addr = Some(addr);
        self
    }
}

/// Collect CGI-style signals from an Axum/Hyper request.
pub fn signals_from_request<B>(request: &Request<B>, source: &SignalSource) -> Signals {
    collect(
        request.method(),
        request.uri(),
        request.headers(),
        request.extensions(),
        source,
    )
}

/// Same as [`signals_from_request`], for extractors that only see the request head.
pub fn signals_from_parts(parts: &Parts, source: &SignalSource) -> Signals {
    collect(
        &parts.method,
        &parts.uri,
        &parts.headers,
        &parts.extensions,
        source,
    )
}

fn collect(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    extensions: &Extensions,
    source: &SignalSource,
) -> Signals {
    let mut signals = Signals::from_headers(headers);

    signals.insert(keys::REQUEST_METHOD, method.as_str());
    let request_uri = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    signals.insert(keys::REQUEST_URI, request_uri);

    // HTTP/2 carries the authority in the URI instead of a Host header.
    if !signals.contains(keys::HOST) {
        if let Some(authority) = uri.authority() {
            signals.insert(keys::HOST, authority.as_str());
        }
    }
    if let Some(scheme) = uri.scheme_str() {
        signals.insert(keys::REQUEST_SCHEME, scheme);
    }

    if let Some(ConnectInfo(remote)) = extensions.get::<ConnectInfo<SocketAddr>>() {
        signals.insert(keys::REMOTE_ADDR, remote.ip().to_string());
    }

    if let Some(local) = source.local_addr {
        signals.insert(keys::SERVER_PORT, local.port().to_string());
        signals.insert(keys::SERVER_NAME, local.ip().to_string());
    }
    if let Some(script_name) = &source.script_name {
        signals.insert(keys::SCRIPT_NAME, script_name.as_str());
    }
    if let Some(software) = &source.server_software {
        signals.insert(keys::SERVER_SOFTWARE, software.as_str());
    }

    signals
}
