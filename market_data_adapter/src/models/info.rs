//! Descriptive instrument metadata.
//!
//! Providers return an open-ended attribute map whose value types drift over
//! time. [`normalize_info`] narrows every value to a JSON scalar so the map can
//! always be serialized and read back unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Ordered attribute map for one instrument, in provider order.
pub type InstrumentInfo = IndexMap<String, InfoValue>;

/// A scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl InfoValue {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InfoValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for InfoValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => InfoValue::Null,
            Value::Bool(b) => InfoValue::Bool(b),
            Value::Number(n) => InfoValue::Number(n),
            Value::String(s) => InfoValue::String(s),
            Value::Object(mut obj) if is_formatted_scalar(&obj) => {
                obj.remove("raw").map(InfoValue::from).unwrap_or(InfoValue::Null)
            }
            other => InfoValue::String(other.to_string()),
        }
    }
}

/// Yahoo wraps many numbers as `{"raw": 1.5, "fmt": "1.50"}`.
fn is_formatted_scalar(obj: &Map<String, Value>) -> bool {
    matches!(
        obj.get("raw"),
        Some(Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))
    ) && obj.keys().all(|k| matches!(k.as_str(), "raw" | "fmt" | "longFmt"))
}

/// Narrows a provider attribute map to scalar values.
pub fn normalize_info(raw: Map<String, Value>) -> InstrumentInfo {
    raw.into_iter()
        .map(|(key, value)| (key, InfoValue::from(value)))
        .collect()
}
