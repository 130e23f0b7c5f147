//! Decoding of upstream list responses.

use serde_json::Value;

use crate::client::FetchError;

/// Keys under which a wrapped response carries its records.
const LIST_KEYS: &[&str] = &["results", "products"];

/// Extract the record list from a response body.
///
/// Accepts a bare array, `{"results": [...]}` (paginated list views) or
/// `{"products": [...]}`. Anything else is a deserialization error.
pub fn decode_envelope(body: Value) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut obj) => LIST_KEYS
            .iter()
            .find_map(|key| match obj.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or_else(|| {
                FetchError::Deserialization(format!(
                    "expected an array or an object with one of {:?}",
                    LIST_KEYS
                ))
            }),
        other => Err(FetchError::Deserialization(format!(
            "expected a list of products, got {}",
            kind_of(&other)
        ))),
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let records = decode_envelope(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_paginated_results() {
        let records =
            decode_envelope(json!({"count": 1, "next": null, "results": [{"id": 1}]})).unwrap();
        assert_eq!(records, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_products_key() {
        let records = decode_envelope(json!({"success": true, "products": []})).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(matches!(
            decode_envelope(json!({"data": []})),
            Err(FetchError::Deserialization(_))
        ));
        assert!(matches!(
            decode_envelope(json!({"results": "nope"})),
            Err(FetchError::Deserialization(_))
        ));
        assert!(matches!(
            decode_envelope(json!("text")),
            Err(FetchError::Deserialization(_))
        ));
    }
}
