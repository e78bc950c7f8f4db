use http::Method;

use crate::config::ResolverConfig;
use crate::context::RequestContext;
use crate::error::ContextError;
use crate::host::resolve_host;
use crate::ip::{is_likely_proxied, resolve_client_ip, resolve_remote_addr};
use crate::port::resolve_port;
use crate::route::{self, base_dir_from, route_from};
use crate::scheme::{resolve_scheme, Scheme};
use crate::signals::{keys, Signals};
use crate::time;
use crate::url::UrlBuilder;

/// Resolution facade over one request's signals and the active configuration.
///
/// Every accessor re-reads the signals; use [`Resolver::capture_current_context`]
/// to evaluate everything once into an immutable [`RequestContext`].
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    signals: &'a Signals,
    config: &'a ResolverConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(signals: &'a Signals, config: &'a ResolverConfig) -> Self {
        Self { signals, config }
    }

    pub fn signals(&self) -> &'a Signals {
        self.signals
    }

    pub fn config(&self) -> &'a ResolverConfig {
        self.config
    }

    pub fn scheme(&self) -> Scheme {
        resolve_scheme(self.signals)
    }

    pub fn is_https(&self) -> bool {
        self.scheme().is_https()
    }

    /// Logical port, possibly reported by a proxy.
    pub fn port(&self) -> u16 {
        resolve_port(self.signals, self.scheme(), false)
    }

    /// Locally bound port, best effort.
    pub fn local_port(&self) -> u16 {
        resolve_port(self.signals, self.scheme(), true)
    }

    pub fn host(&self) -> Result<String, ContextError> {
        resolve_host(self.signals, self.config.host_override())
    }

    pub fn client_ip(&self) -> Option<String> {
        resolve_client_ip(self.signals)
    }

    pub fn remote_addr(&self) -> Option<String> {
        resolve_remote_addr(self.signals)
    }

    pub fn is_likely_proxied(&self) -> bool {
        is_likely_proxied(self.signals)
    }

    pub fn uri(&self) -> String {
        route::request_uri(self.signals)
    }

    pub fn route(&self) -> String {
        route::resolve_route(self.signals)
    }

    pub fn base_dir(&self) -> Result<String, ContextError> {
        route::resolve_base_dir(self.signals)
    }

    pub fn script_name(&self) -> String {
        route::script_name(self.signals)
    }

    pub fn script_dir(&self) -> String {
        route::script_dir(self.signals)
    }

    pub fn script_filename(&self) -> String {
        self.trimmed(keys::SCRIPT_FILENAME)
    }

    pub fn server_software(&self) -> Option<String> {
        self.signals.get(keys::SERVER_SOFTWARE).map(str::to_string)
    }

    pub fn user_agent(&self) -> String {
        self.signals
            .get(keys::USER_AGENT)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Uppercase request verb, empty when the signal is absent.
    pub fn method(&self) -> String {
        self.trimmed(keys::REQUEST_METHOD).to_ascii_uppercase()
    }

    pub fn is_method(&self, method: &Method) -> bool {
        self.method() == method.as_str()
    }

    pub fn is_get(&self) -> bool {
        self.is_method(&Method::GET)
    }

    pub fn is_post(&self) -> bool {
        self.is_method(&Method::POST)
    }

    pub fn is_put(&self) -> bool {
        self.is_method(&Method::PUT)
    }

    pub fn is_patch(&self) -> bool {
        self.is_method(&Method::PATCH)
    }

    pub fn is_delete(&self) -> bool {
        self.is_method(&Method::DELETE)
    }

    pub fn url_builder(&self) -> Result<UrlBuilder, ContextError> {
        Ok(UrlBuilder::new(self.scheme(), self.host()?, self.script_dir()))
    }

    pub fn http_host(&self) -> Result<String, ContextError> {
        Ok(self.url_builder()?.http_host())
    }

    pub fn base_url(&self) -> Result<String, ContextError> {
        Ok(self.url_builder()?.base_url())
    }

    pub fn build_absolute_url(&self, route: &str) -> Result<String, ContextError> {
        self.url_builder()?.build(route)
    }

    pub fn subdir_url(&self, dotted: &str) -> Result<String, ContextError> {
        self.url_builder()?.subdir_url(dotted)
    }

    /// Evaluates every resolver once and freezes the result.
    ///
    /// Fails only when the host cannot be determined (or, defensively, when
    /// the route cannot be normalised); every other field degrades to a default.
    pub fn capture_current_context(&self) -> Result<RequestContext, ContextError> {
        let scheme = self.scheme();
        let host = self.host()?;
        let uri = self.uri();
        let route = route_from(&uri, &self.script_name());
        let dir = base_dir_from(&uri, &route)?;
        let urls = UrlBuilder::new(scheme, host.clone(), self.script_dir());
        let url = urls.build(&route)?;

        let context = RequestContext {
            url,
            client_ip: self.client_ip().unwrap_or_default(),
            remote_addr: self.remote_addr().unwrap_or_default(),
            user_agent: self.user_agent(),
            scheme,
            host,
            port: resolve_port(self.signals, scheme, false),
            local_port: resolve_port(self.signals, scheme, true),
            dir,
            route,
            uri,
            method: self.method(),
            time: time::now_string(),
        };

        log::debug!(
            "captured request context method={} host={} route={} dir={}",
            context.method,
            context.host,
            context.route,
            context.dir
        );
        Ok(context)
    }

    fn trimmed(&self, key: &str) -> String {
        self.signals
            .get(key)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}
