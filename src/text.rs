//! Text boundary: JSON text ⇄ `serde_json::Value`.
//!
//! Parsing never fails outward. Malformed input becomes `null`, which every
//! decoder treats as a structural mismatch (empty/default result).
use serde_json::Value;

pub fn parse(text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(node) => node,
        Err(error) => {
            tracing::debug!(%error, "malformed JSON text, using null");
            Value::Null
        }
    }
}

pub fn parse_bytes(data: &[u8]) -> Value {
    match serde_json::from_slice(data) {
        Ok(node) => node,
        Err(error) => {
            tracing::debug!(%error, "malformed JSON bytes, using null");
            Value::Null
        }
    }
}

/// Compact text.
pub fn print(node: &Value) -> String { node.to_string() }

/// Indented text.
pub fn print_pretty(node: &Value) -> String { format!("{node:#}") }
