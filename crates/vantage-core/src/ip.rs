use std::net::IpAddr;

use crate::probe::probe;
use crate::signals::{keys, Signals};

/// Signals that may carry the client address, in precedence order.
pub const IP_KEYS: &[&str] = &[keys::FORWARDED_FOR, keys::CLIENT_IP, keys::REMOTE_ADDR];

/// Best guess at the client address: the first candidate in [`IP_KEYS`] that
/// is a syntactically valid IPv4 or IPv6 address. For `X-Forwarded-For` lists
/// only the left-most (originating) entry is considered.
pub fn resolve_client_ip(signals: &Signals) -> Option<String> {
    IP_KEYS.iter().find_map(|key| {
        let candidate = probe(signals.get(key))?;
        let candidate = if *key == keys::FORWARDED_FOR {
            probe(candidate.split(',').next())?
        } else {
            candidate
        };
        match candidate.parse::<IpAddr>() {
            Ok(_) => Some(candidate.to_string()),
            Err(_) => {
                log::debug!("ignoring invalid address {:?} from {}", candidate, key);
                None
            }
        }
    })
}

/// Raw connection peer address, unvalidated. Absent outside network contexts.
pub fn resolve_remote_addr(signals: &Signals) -> Option<String> {
    signals.get(keys::REMOTE_ADDR).map(str::to_string)
}

/// Heuristic: true when the resolved client address differs from the peer.
/// A mismatch suggests a proxy in front of the application but proves nothing.
pub fn is_likely_proxied(signals: &Signals) -> bool {
    resolve_client_ip(signals) != resolve_remote_addr(signals)
}
