use serde::Serialize;

use crate::error::ContextError;
use crate::probe::probe;
use crate::signals::{keys, Signals};

/// Signals that may carry the request host, in precedence order.
pub const HOST_KEYS: &[&str] = &[keys::FORWARDED_HOST, keys::HOST, keys::SERVER_NAME];

/// Developer-supplied host that either replaces or backs up header resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HostOverride {
    host: String,
    required: bool,
}

impl HostOverride {
    /// Creates an override, rejecting blank hosts. The stored host is trimmed.
    pub fn new(host: impl AsRef<str>, required: bool) -> Result<Self, ContextError> {
        let host = probe(Some(host.as_ref())).ok_or_else(|| {
            ContextError::invalid_override("custom host or domain name must not be empty")
        })?;
        Ok(Self {
            host: host.to_string(),
            required,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// When true the override is used unconditionally and headers are never consulted.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Resolves the request host.
///
/// A required override short-circuits the header scan. Otherwise the first
/// non-blank value in [`HOST_KEYS`] wins, then an optional override, and
/// failing both the host is unresolved.
pub fn resolve_host(
    signals: &Signals,
    host_override: Option<&HostOverride>,
) -> Result<String, ContextError> {
    if let Some(forced) = host_override.filter(|o| o.is_required()) {
        return Ok(forced.host().to_string());
    }

    for key in HOST_KEYS {
        if let Some(host) = probe(signals.get(key)) {
            log::debug!("host resolved to {} from {}", host, key);
            return Ok(host.to_string());
        }
    }

    match host_override {
        Some(fallback) => {
            log::debug!("host signals absent, using override {}", fallback.host());
            Ok(fallback.host().to_string())
        }
        None => Err(ContextError::HostUnresolved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals_from(pairs: &[(&str, &str)]) -> Signals {
        pairs.iter().copied().collect()
    }

    #[test]
    fn forwarded_host_has_priority() {
        let signals = signals_from(&[
            (keys::HOST, "internal.local"),
            (keys::FORWARDED_HOST, "example.com"),
            (keys::SERVER_NAME, "server.local"),
        ]);
        assert_eq!(resolve_host(&signals, None).unwrap(), "example.com");
    }

    #[test]
    fn blank_values_are_skipped() {
        let signals = signals_from(&[
            (keys::FORWARDED_HOST, "   "),
            (keys::HOST, ""),
            (keys::SERVER_NAME, " server.local "),
        ]);
        assert_eq!(resolve_host(&signals, None).unwrap(), "server.local");
    }

    #[test]
    fn optional_override_is_only_a_fallback() {
        let fallback = HostOverride::new("ciencia.com", false).unwrap();

        let with_header = signals_from(&[(keys::HOST, "example.com")]);
        assert_eq!(
            resolve_host(&with_header, Some(&fallback)).unwrap(),
            "example.com"
        );
        assert_eq!(
            resolve_host(&Signals::new(), Some(&fallback)).unwrap(),
            "ciencia.com"
        );
    }

    #[test]
    fn required_override_ignores_headers() {
        let forced = HostOverride::new("ciencia.com", true).unwrap();
        let signals = signals_from(&[(keys::FORWARDED_HOST, "example.com"), (keys::HOST, "a.b")]);
        assert_eq!(resolve_host(&signals, Some(&forced)).unwrap(), "ciencia.com");
    }

    #[test]
    fn missing_host_without_override_fails() {
        let err = resolve_host(&Signals::new(), None).unwrap_err();
        assert_eq!(err, ContextError::HostUnresolved);
    }

    #[test]
    fn blank_override_is_rejected() {
        for host in ["", "   "] {
            let err = HostOverride::new(host, false).unwrap_err();
            assert!(matches!(err, ContextError::InvalidOverride { .. }));
        }
    }

    #[test]
    fn override_is_trimmed() {
        let o = HostOverride::new("  ciencia.com  ", true).unwrap();
        assert_eq!(o.host(), "ciencia.com");
        assert!(o.is_required());
    }
}
