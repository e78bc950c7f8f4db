use serde::Serialize;

use crate::scheme::Scheme;

/// Immutable snapshot of what was requested, captured once per request.
///
/// Built by [`Resolver::capture_current_context`](crate::resolver::Resolver::capture_current_context).
/// Later changes to the underlying signals do not affect an existing snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub(crate) url: String,
    pub(crate) client_ip: String,
    pub(crate) remote_addr: String,
    pub(crate) user_agent: String,
    pub(crate) scheme: Scheme,
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) local_port: u16,
    pub(crate) dir: String,
    pub(crate) route: String,
    pub(crate) uri: String,
    pub(crate) method: String,
    pub(crate) time: String,
}

impl RequestContext {
    /// Absolute URL of the current request.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Validated client address; empty when none could be determined.
    pub fn client_ip(&self) -> &str {
        &self.client_ip
    }

    /// Raw peer address; empty outside network contexts.
    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Uppercase verb, empty when undeterminable.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn is_likely_proxied(&self) -> bool {
        self.client_ip != self.remote_addr
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
