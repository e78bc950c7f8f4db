use crate::scheme::Scheme;
use crate::signals::{keys, Signals};

/// Signals that may carry the request port, in precedence order.
pub const PORT_KEYS: &[&str] = &[keys::FORWARDED_PORT, keys::SERVER_PORT];

/// Resolves the request port for an already resolved `scheme`.
///
/// With `local` set, the locally bound `SERVER_PORT` wins over anything a proxy
/// reports. Otherwise https always maps to 443, and plain http takes the first
/// usable value from [`PORT_KEYS`] before falling back to the scheme default.
/// Non-numeric or out-of-range candidates are skipped.
pub fn resolve_port(signals: &Signals, scheme: Scheme, local: bool) -> u16 {
    let default_port = scheme.default_port();

    if local {
        if let Some(port) = signals.get(keys::SERVER_PORT).and_then(parse_port) {
            return port;
        }
    }

    if scheme.is_https() {
        return default_port;
    }

    for key in PORT_KEYS {
        let Some(raw) = signals.get(key) else {
            continue;
        };
        match parse_port(raw) {
            Some(port) => {
                log::debug!("port resolved to {} from {}", port, key);
                return port;
            }
            None => log::debug!("ignoring unusable port {:?} from {}", raw, key),
        }
    }

    default_port
}

fn parse_port(raw: &str) -> Option<u16> {
    let value = raw.trim().parse::<i64>().ok()?;
    u16::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals_from(pairs: &[(&str, &str)]) -> Signals {
        pairs.iter().copied().collect()
    }

    #[test]
    fn local_mode_prefers_server_port() {
        let signals = signals_from(&[(keys::SERVER_PORT, "8443")]);
        assert_eq!(resolve_port(&signals, Scheme::Http, true), 8443);
    }

    #[test]
    fn local_mode_wins_even_over_https() {
        let signals = signals_from(&[(keys::SERVER_PORT, "8443")]);
        assert_eq!(resolve_port(&signals, Scheme::Https, true), 8443);
    }

    #[test]
    fn https_short_circuits_to_443() {
        let signals = signals_from(&[(keys::SERVER_PORT, "8443"), (keys::FORWARDED_PORT, "9000")]);
        assert_eq!(resolve_port(&signals, Scheme::Https, false), 443);
    }

    #[test]
    fn forwarded_port_beats_server_port() {
        let signals = signals_from(&[(keys::SERVER_PORT, "8080"), (keys::FORWARDED_PORT, "9000")]);
        assert_eq!(resolve_port(&signals, Scheme::Http, false), 9000);
    }

    #[test]
    fn invalid_candidates_are_skipped() {
        let signals = signals_from(&[(keys::FORWARDED_PORT, "70000"), (keys::SERVER_PORT, "8080")]);
        assert_eq!(resolve_port(&signals, Scheme::Http, false), 8080);

        let signals = signals_from(&[(keys::FORWARDED_PORT, "abc"), (keys::SERVER_PORT, "-1")]);
        assert_eq!(resolve_port(&signals, Scheme::Http, false), 80);
    }

    #[test]
    fn local_mode_falls_through_on_bad_server_port() {
        let signals = signals_from(&[(keys::SERVER_PORT, "not-a-port"), (keys::FORWARDED_PORT, "81")]);
        assert_eq!(resolve_port(&signals, Scheme::Http, true), 81);
        assert_eq!(resolve_port(&signals, Scheme::Https, true), 443);
    }

    #[test]
    fn no_signals_uses_scheme_default() {
        let signals = Signals::new();
        assert_eq!(resolve_port(&signals, Scheme::Http, false), 80);
        assert_eq!(resolve_port(&signals, Scheme::Http, true), 80);
        assert_eq!(resolve_port(&signals, Scheme::Https, false), 443);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert_eq!(parse_port("0"), Some(0));
        assert_eq!(parse_port(" 65535 "), Some(65535));
        assert_eq!(parse_port("65536"), None);
        assert_eq!(parse_port(""), None);
    }
}
