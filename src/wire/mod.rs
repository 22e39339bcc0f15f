//! Normalization of vendor payloads into canonical records.
//!
//! The console answers in three shapes:
//!
//! - JSON objects whose keys carry a leading underscore (`_userName`)
//! - JSON arrays of such objects (or `null` for an empty collection)
//! - XML documents with an `ArrayOf<Type>` root wrapping repeated `<Type>` elements
//!
//! All three are reduced to [`RawRecord`]s with the underscore prefix removed.
//! Typed records are then read from a raw record through the per-type field
//! tables in [`mapping`], which also keep the raw record around for callers
//! that need vendor-specific attributes.

pub mod datetime;
pub mod mapping;
pub mod xml;

pub use datetime::{parse_vendor_datetime, parse_vendor_datetime_str};
pub use mapping::{FieldMap, Fields};
pub use xml::parse_array_of;

use crate::error::{ConsoleError, ConsoleResult};
use serde_json::{Map, Value};

/// A vendor record with normalized field names, values untouched.
pub type RawRecord = Map<String, Value>;

/// Remove the vendor's underscore prefix from a field name.
///
/// Stripping is idempotent: an already-stripped key is returned unchanged.
pub fn strip_prefix(key: &str) -> &str {
    key.trim_start_matches('_')
}

/// Parse a JSON response body. An empty body is treated as `null`.
pub fn parse_json(body: &str) -> ConsoleResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Normalize one JSON object, recursing into nested objects and arrays.
pub fn normalize_object(value: &Value) -> ConsoleResult<RawRecord> {
    match value {
        Value::Object(map) => Ok(strip_map(map)),
        _ => Err(ConsoleError::unexpected_payload(format!(
            "a JSON object, found {}",
            kind_of(value)
        ))),
    }
}

/// Normalize a JSON collection. `null` is an empty collection.
pub fn normalize_array(value: &Value) -> ConsoleResult<Vec<RawRecord>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(normalize_object).collect(),
        _ => Err(ConsoleError::unexpected_payload(format!(
            "a JSON array, found {}",
            kind_of(value)
        ))),
    }
}

/// Normalize the named collection inside a JSON object, e.g. `localGroups`.
///
/// The collection key is matched after prefix stripping; a missing key is an
/// empty collection.
pub fn normalize_collection(value: &Value, key: &str) -> ConsoleResult<Vec<RawRecord>> {
    let record = normalize_object(value)?;
    match record.get(key) {
        Some(items) => normalize_array(items),
        None => Ok(Vec::new()),
    }
}

fn strip_map(map: &Map<String, Value>) -> RawRecord {
    map.iter()
        .map(|(key, value)| (strip_prefix(key).to_string(), strip_value(value)))
        .collect()
}

fn strip_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(strip_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(strip_value).collect()),
        other => other.clone(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
