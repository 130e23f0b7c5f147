//! Prioritized field lookup over loosely-shaped JSON records.
//!
//! Every resolver takes an ordered list of candidate keys and returns the
//! first value that is usable for the requested type. A key that is present
//! but unusable (blank, `"undefined"`, wrong type) is skipped, not fatal.

use serde_json::{Map, Value};

/// String values that upstream serializers emit for missing fields.
const ABSENT_MARKERS: [&str; 2] = ["undefined", "null"];

/// A non-blank string that is not an absence marker, trimmed.
pub(crate) fn usable_str(value: &Value) -> Option<&str> {
    let s = value.as_str()?.trim();
    if s.is_empty() || ABSENT_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m)) {
        None
    } else {
        Some(s)
    }
}

/// First usable string among `keys`.
pub(crate) fn first_text<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(usable_str)
}

/// A finite number, from a JSON number or a numeric string.
pub(crate) fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(_) => usable_str(value)?.parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// First usable number among `keys`.
pub(crate) fn first_number(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|key| record.get(*key)).find_map(number)
}

/// First usable count among `keys`. Fractions are truncated and negative
/// values clamp to zero.
pub(crate) fn first_count(record: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().filter_map(|key| record.get(*key)).find_map(|value| {
        if let Some(n) = value.as_u64() {
            return Some(n);
        }
        let n = number(value)?;
        Some(if n <= 0.0 { 0 } else { n.trunc() as u64 })
    })
}

/// String form of an identifier value.
///
/// Integral floats render without a fractional part so `7` and `7.0`
/// name the same product.
pub(crate) fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => usable_str(value).map(str::to_string),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                let f = n.as_f64()?;
                if !f.is_finite() {
                    None
                } else if f.fract() == 0.0 && f.abs() < 1e15 {
                    Some(format!("{}", f as i64))
                } else {
                    Some(f.to_string())
                }
            }
        }
        _ => None,
    }
}

/// First usable identifier among `keys`.
pub(crate) fn first_identifier(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(identifier)
}

/// Truthiness of a flag field (`true`, `"true"`, `1`).
pub(crate) fn first_flag(record: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .any(|value| match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_i64() == Some(1),
            Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
}

/// `name` of a nested object stored under `key`.
pub(crate) fn nested_name<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)?
        .as_object()
        .and_then(|inner| first_text(inner, &["name", "title"]))
}
