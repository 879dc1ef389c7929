//! Record data model
//!
//! A [`Record`] is one structured input event: an insertion-ordered mapping from string keys
//! to JSON values (strings, numbers, booleans, `null`, nested objects and arrays).

pub use serde_json::Value;

use crate::core::error::FormatError;

/// One structured event, keys kept in insertion order
pub type Record = serde_json::Map<String, Value>;

/// Short human-readable name of the kind of a [`Value`]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Convert an already parsed [`Value`] into a [`Record`]
///
/// Only JSON objects are records, everything else yields [`FormatError::NotARecord`].
pub fn value_into_record(value: Value) -> Result<Record, FormatError> {
    match value {
        Value::Object(record) => Ok(record),
        other => Err(FormatError::NotARecord {
            found: value_kind(&other),
        }),
    }
}

/// Parse a single JSON document (e.g., one line of newline-delimited JSON) into a [`Record`]
pub fn parse_record(json: &str) -> Result<Record, FormatError> {
    value_into_record(serde_json::from_str(json)?)
}
