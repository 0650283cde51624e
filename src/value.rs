//! Best-effort access into loosely shaped JSON documents.
//!
//! Printer servers are free to omit or mistype fields; lookups here never
//! fail, they fall back to the type's zero value instead.

use serde_json::Value;

/// Parse a response body. Callers fall back to `null` on error.
pub(crate) fn parse_body(body: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(body)
}

/// Walk `keys` from `root`, yielding `null` as soon as a key is missing.
pub(crate) fn lookup<'a>(root: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter().fold(root, |value, key| &value[*key])
}

/// Number at `keys`, or `0.0`.
pub(crate) fn number(root: &Value, keys: &[&str]) -> f64 {
    lookup(root, keys).as_f64().unwrap_or_default()
}

/// String at `keys`, or the empty string.
pub(crate) fn text(root: &Value, keys: &[&str]) -> String {
    lookup(root, keys).as_str().unwrap_or_default().to_owned()
}

/// Whether the value at `keys` is `true` or a non-zero number.
pub(crate) fn truthy(root: &Value, keys: &[&str]) -> bool {
    match lookup(root, keys) {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
