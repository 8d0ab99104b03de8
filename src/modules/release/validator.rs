use serde_json::Value;

use crate::infrastructure::store::Document;

/// Fields every release must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "director", "genre", "studio", "releaseDate"];

/// `null`, `false`, zero and the empty string count as missing, matching how
/// the browser client treats form values.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Required fields that are absent or falsy. Empty means the candidate is valid.
pub fn missing_fields(candidate: &Document) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| candidate.get(*field).is_none_or(is_falsy))
        .collect()
}
