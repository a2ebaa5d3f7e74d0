//! Interpret extraction service responses as items
//!
//! All functions here report failure as `Err(String)` diagnostics; the
//! iterator absorbs them into stream exhaustion rather than raising.

use serde_json::Value;

/// Literal clean-termination marker for slow-mode streams
pub const SENTINEL: &str = "NO_MORE_ITEMS";

/// Keys recognized for the structured-input short circuit
pub const RECOGNIZED_KEYS: [&str; 3] = ["changes", "items", "results"];

/// Pull an item sequence directly out of already-structured content
///
/// Returns `Some` when content is a JSON array, a JSON object carrying an
/// array under one of the recognized keys, or a string that parses to a JSON
/// array. No extraction service call is needed in any of these cases.
pub(crate) fn direct_items(content: &Value) -> Option<Vec<Value>> {
    match content {
        Value::Array(items) => Some(items.clone()),
        Value::Object(map) => RECOGNIZED_KEYS.iter().find_map(|key| match map.get(*key) {
            Some(Value::Array(items)) => Some(items.clone()),
            _ => None,
        }),
        Value::String(text) => match serde_json::from_str(text.trim()) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Parse a bulk response into the complete item sequence
///
/// Already-structured arrays pass through; a lone object counts as a
/// single-item sequence; textual responses are parsed as JSON after
/// stripping any markdown code fence.
pub(crate) fn parse_bulk(value: &Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::Object(_) => Ok(vec![value.clone()]),
        Value::String(text) => {
            let stripped = strip_code_fence(text);
            let parsed: Value = serde_json::from_str(stripped.trim())
                .map_err(|e| format!("response is not valid JSON: {}", e))?;
            match parsed {
                Value::Array(items) => Ok(items),
                Value::Object(_) => Ok(vec![parsed]),
                other => Err(format!(
                    "expected a JSON array of items, got {}",
                    json_kind(&other)
                )),
            }
        }
        other => Err(format!(
            "unsupported bulk response shape: {}",
            json_kind(other)
        )),
    }
}

/// Interpret a slow-mode response as exactly one structured item
///
/// Structured values pass through as-is; textual values are parsed as JSON;
/// a single-element array wrapper is unwrapped either way.
pub(crate) fn parse_item(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(text) => {
            let stripped = strip_code_fence(text);
            let parsed: Value = serde_json::from_str(stripped.trim())
                .map_err(|e| format!("response is not valid JSON: {}", e))?;
            Ok(unwrap_singleton(parsed))
        }
        other => Ok(unwrap_singleton(other.clone())),
    }
}

/// Check a response value for the clean-termination sentinel
///
/// Matching is case-insensitive and ignores whitespace and separators, so
/// `"NO_MORE_ITEMS"` and `"no more items"` both terminate the stream.
pub(crate) fn is_sentinel(value: &Value) -> bool {
    match value {
        Value::String(text) => {
            let normalized: String = text
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase();
            normalized == "nomoreitems"
        }
        _ => false,
    }
}

fn unwrap_singleton(value: Value) -> Value {
    match value {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    }
}

/// Strip a markdown code fence if the response is wrapped in one
///
/// LLMs sometimes wrap JSON in ```json blocks despite instructions.
fn strip_code_fence(response: &str) -> String {
    let trimmed = response.trim();
    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return String::new();
        }
        lines[1..lines.len().saturating_sub(1)].join("\n")
    } else {
        trimmed.to_string()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
