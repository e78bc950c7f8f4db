//! Capture timestamps.

use chrono::{DateTime, Utc};

/// Textual format of [`RequestContext::time`](crate::context::RequestContext::time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// `YYYY-MM-DD HH:MM:SS.ffffff` in UTC.
pub fn now_string() -> String {
    format_timestamp(&now())
}

/// Like [`now_string`] but safe to embed in a file name.
pub fn now_for_filename() -> String {
    filename_timestamp(&now())
}

/// Seconds since the epoch with microsecond fraction, e.g. `1700000000.123456`.
pub fn unix_microtime() -> String {
    let now = now();
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn filename_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d-%H-%M-%S-%6f").to_string()
}
