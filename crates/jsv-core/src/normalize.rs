//! # JSON Normalization — Null Stripping
//!
//! Documents submitted for validation often carry explicit `null` where the
//! author meant "field absent". Schemas in this domain declare such fields
//! with a concrete type (e.g. `"type": "string"`) and no null union, so the
//! nulls are removed before the document reaches the validator.
//!
//! ## Rules
//!
//! 1. An object key whose value is `null` is removed.
//! 2. An object value is normalized recursively and then kept, even when it
//!    ends up empty.
//! 3. Arrays and non-null scalars pass through unchanged. Null array
//!    elements, and objects nested inside arrays, are not touched.
//!
//! [`strip_nulls`] is pure and idempotent.

use serde_json::{Map, Value};

use crate::error::ParseError;

/// A parsed request document: a JSON object keyed by strings.
pub type Document = Map<String, Value>;

/// Parse raw bytes into a [`Document`].
///
/// Fails with [`ParseError::Syntax`] for malformed JSON and with
/// [`ParseError::NotAnObject`] when the top-level value is anything other
/// than an object.
pub fn parse(bytes: &[u8]) -> Result<Document, ParseError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(map),
        other => Err(ParseError::NotAnObject(kind_name(&other))),
    }
}

/// Remove null-valued keys from `doc`, recursing into nested objects.
pub fn strip_nulls(doc: Document) -> Document {
    doc.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::Object(inner) => Some((key, Value::Object(strip_nulls(inner)))),
            other => Some((key, other)),
        })
        .collect()
}

/// Parse and strip nulls in one step.
pub fn normalize(bytes: &[u8]) -> Result<Document, ParseError> {
    parse(bytes).map(strip_nulls)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("test fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn test_strip_nulls_nested() {
        let input = doc(json!({"a": null, "b": {"c": null, "d": 1}}));
        assert_eq!(strip_nulls(input), doc(json!({"b": {"d": 1}})));
    }

    #[test]
    fn test_empty_object_is_kept() {
        let input = doc(json!({"outer": {"only": null}}));
        assert_eq!(strip_nulls(input), doc(json!({"outer": {}})));
    }

    #[test]
    fn test_arrays_untouched() {
        let input = doc(json!({
            "list": [1, null, {"x": null}],
            "gone": null
        }));
        assert_eq!(
            strip_nulls(input),
            doc(json!({"list": [1, null, {"x": null}]}))
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        let input = doc(json!({
            "s": "text",
            "n": 4.5,
            "b": false,
            "z": 0,
            "e": ""
        }));
        assert_eq!(strip_nulls(input.clone()), input);
    }

    #[test]
    fn test_deep_nesting() {
        let input = doc(json!({"a": {"b": {"c": {"d": null, "e": "keep"}}}}));
        assert_eq!(
            strip_nulls(input),
            doc(json!({"a": {"b": {"c": {"e": "keep"}}}}))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(parse(b"{\"a\": "), Err(ParseError::Syntax(_))));
        assert!(matches!(parse(b""), Err(ParseError::Syntax(_))));
        assert!(matches!(parse(b"not json"), Err(ParseError::Syntax(_))));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(parse(b"[1, 2]"), Err(ParseError::NotAnObject("array"))));
        assert!(matches!(parse(b"null"), Err(ParseError::NotAnObject("null"))));
        assert!(matches!(parse(b"\"x\""), Err(ParseError::NotAnObject("string"))));
    }

    #[test]
    fn test_normalize_combines_parse_and_strip() {
        let out = normalize(br#"{"name": "x", "nick": null}"#).unwrap();
        assert_eq!(out, doc(json!({"name": "x"})));
    }
}
