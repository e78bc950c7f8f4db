//! Helpers for reading raw signal values.

use std::borrow::Cow;

/// Returns the trimmed value, or `None` when it is absent or blank.
pub fn probe(value: Option<&str>) -> Option<&str> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Percent-decodes `raw`. Invalid UTF-8 sequences are replaced rather than rejected.
pub fn percent_decode(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(raw.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(raw),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}
