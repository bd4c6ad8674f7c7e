//! Array normalization
//!
//! List-typed fields must always hold an ordered sequence, never `null`
//! or an absent key. Runs once at entity construction, before any
//! observer is registered.

use serde_json::{Map, Value};

/// Falsy in the editor's sense: `null`, `false`, `0`, or the empty string
#[inline]
#[must_use]
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Replace every absent or falsy field in `names` with an empty list
///
/// Existing lists and other truthy values are left as they are.
pub fn normalize_arrays(fields: &mut Map<String, Value>, names: &[&str]) {
    for &name in names {
        let missing = fields.get(name).map_or(true, is_falsy);
        if missing {
            tracing::debug!(field = name, "normalizing list field to []");
            fields.insert(name.to_owned(), Value::Array(Vec::new()));
        }
    }
}
