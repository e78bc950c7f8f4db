use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signals::{keys, Signals};

/// Signals that may announce an https request, in precedence order.
pub const SCHEME_KEYS: &[&str] = &[keys::FORWARDED_PROTO, keys::REQUEST_SCHEME, keys::HTTPS];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Port implied by the scheme when nothing else is known.
    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn is_https(&self) -> bool {
        matches!(self, Scheme::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the request scheme. The first truthy signal in [`SCHEME_KEYS`]
/// yields `https`; with no truthy signal (including a bare command-line
/// invocation) the result is `http`.
pub fn resolve_scheme(signals: &Signals) -> Scheme {
    for key in SCHEME_KEYS {
        let Some(value) = signals.get(key) else {
            continue;
        };
        if is_likely_https(value) {
            log::debug!("scheme resolved to https from {}", key);
            return Scheme::Https;
        }
    }
    Scheme::Http
}

fn is_likely_https(value: &str) -> bool {
    let value = value.trim();
    ["on", "1", "true", "https"]
        .iter()
        .any(|candidate| value.eq_ignore_ascii_case(candidate))
}
