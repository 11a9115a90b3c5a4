//! Lenient conversions from loosely typed stored JSON into typed fields.
//!
//! Stored records were written by hand-rolled form code, so a field that
//! should hold text may hold `null`, a number or a boolean. Falsy values
//! collapse to the field default; everything else keeps its JSON text.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text of a scalar, or "" for falsy values and containers.
pub fn text_or_empty(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// JavaScript-style truthiness.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_or_empty(&value))
}

/// Like [`lenient_string`], but an empty result means "no id yet".
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_string(deserializer)?;
    Ok(Some(text).filter(|s| !s.is_empty()))
}

pub(crate) fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}
