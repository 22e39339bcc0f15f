//! Permissive parsing of vendor timestamps.
//!
//! Timestamps arrive as `yyyy-MM-ddTHH:mm:ss`, sometimes with a fractional
//! seconds suffix. The suffix is cut off before parsing. Anything that does
//! not parse yields `None`.

use chrono::NaiveDateTime;
use serde_json::Value;

const VENDOR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a timestamp from a JSON value. Non-strings yield `None`.
pub fn parse_vendor_datetime(value: &Value) -> Option<NaiveDateTime> {
    value.as_str().and_then(parse_vendor_datetime_str)
}

/// Parse a timestamp string, discarding any fractional seconds.
pub fn parse_vendor_datetime_str(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    let whole_seconds = match trimmed.find('.') {
        Some(index) => &trimmed[..index],
        None => trimmed,
    };
    NaiveDateTime::parse_from_str(whole_seconds, VENDOR_FORMAT).ok()
}
