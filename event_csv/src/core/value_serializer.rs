//! Turning resolved values into cell text

use std::borrow::Cow;

use crate::core::{error::FormatError, record::Value};

/// Leading characters that make spreadsheet applications evaluate a cell as a formula
pub const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Serialize a resolved value (or an absent one) into the text of a single cell
///
/// - absent values and `null` become the empty string
/// - objects and arrays are written as compact JSON, keys in insertion order
/// - numbers and booleans use their JSON representation
/// - strings are passed through [`escape_formula`] if `spreadsheet_safe` is set
///
/// The result is not yet quoted for the delimited output.
pub fn serialize_value(
    value: Option<&Value>,
    spreadsheet_safe: bool,
) -> Result<Cow<'_, str>, FormatError> {
    Ok(match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) if spreadsheet_safe => escape_formula(s),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(true)) => Cow::Borrowed("true"),
        Some(Value::Bool(false)) => Cow::Borrowed("false"),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(composite @ (Value::Array(_) | Value::Object(_))) => {
            Cow::Owned(serde_json::to_string(composite)?)
        }
    })
}

/// Prefix strings starting with a [formula trigger](FORMULA_TRIGGERS) with an apostrophe
pub fn escape_formula(s: &str) -> Cow<'_, str> {
    if s.starts_with(FORMULA_TRIGGERS) {
        Cow::Owned(format!("'{s}"))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cell(value: Value, safe: bool) -> String {
        serialize_value(Some(&value), safe).unwrap().into_owned()
    }

    #[test]
    fn absent_and_null_are_empty() {
        assert_eq!(serialize_value(None, true).unwrap(), "");
        assert_eq!(cell(Value::Null, true), "");
    }

    #[test]
    fn scalars_use_json_text() {
        assert_eq!(cell(json!(42), true), "42");
        assert_eq!(cell(json!(-7), true), "-7");
        assert_eq!(cell(json!(1.5), true), "1.5");
        assert_eq!(cell(json!(true), true), "true");
        assert_eq!(cell(json!(false), false), "false");
        assert_eq!(cell(json!("plain"), true), "plain");
    }

    #[test]
    fn composites_are_compact_json_in_insertion_order() {
        assert_eq!(cell(json!({"one": "two"}), true), r#"{"one":"two"}"#);
        assert_eq!(
            cell(json!({"z": 1, "a": [true, null, "x"], "m": {"k": 2.5}}), true),
            r#"{"z":1,"a":[true,null,"x"],"m":{"k":2.5}}"#
        );
        assert_eq!(cell(json!([]), true), "[]");
        // Strings inside composites are never formula-escaped
        assert_eq!(cell(json!(["=1+1"]), true), r#"["=1+1"]"#);
    }

    #[test]
    fn formula_triggers_are_escaped_when_safe() {
        for raw in ["=1+1", "+1", "-1", "@SUM(A1)"] {
            assert_eq!(cell(json!(raw), true), format!("'{raw}"));
            assert_eq!(cell(json!(raw), false), raw);
        }
        assert_eq!(cell(json!("1+1"), true), "1+1");
        assert_eq!(cell(json!("a=b"), true), "a=b");
        assert_eq!(cell(json!(""), true), "");
    }

    #[test]
    fn negative_numbers_are_not_escaped() {
        assert_eq!(cell(json!(-12), true), "-12");
    }

    #[test]
    fn unchanged_cells_are_borrowed() {
        let value = json!("unchanged");
        assert!(matches!(
            serialize_value(Some(&value), true).unwrap(),
            Cow::Borrowed(_)
        ));
    }
}
