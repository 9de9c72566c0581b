//! JSON5-to-strict-JSON conversion.
//!
//! The converter lowers a decoded JSON5 value into a `serde_json` tree and
//! renders it as strict JSON. JSON has no `NaN`/`Infinity`, so non-finite
//! floats lower to `null`.

use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

use quint::Value;

use crate::error::Result;

/// Lowers a JSON5 value into a strict-JSON value tree. Member order is
/// preserved.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => match serde_json::Number::from_f64(*f) {
            Some(number) => serde_json::Value::Number(number),
            None => serde_json::Value::Null,
        },
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        ),
    }
}

/// Renders a strict-JSON value, compact or indented by `space` spaces.
pub fn render(json: &serde_json::Value, space: Option<usize>) -> Result<String> {
    use serde::Serialize;

    match space {
        None => Ok(serde_json::to_string(json)?),
        Some(n) => {
            let indent = " ".repeat(n);
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut out = Vec::new();
            let mut serializer = Serializer::with_formatter(&mut out, formatter);
            json.serialize(&mut serializer)?;
            Ok(String::from_utf8_lossy(&out).into_owned())
        },
    }
}
