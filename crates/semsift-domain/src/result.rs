//! Result shape of one extraction service round trip

use serde_json::Value;

/// Outcome of a single `extract` call
///
/// The iterator core never inspects how the call was implemented - only this
/// shape. `raw_response` is always retained for diagnostics, even on failure.
#[derive(Debug, Clone)]
pub struct ExtractResult {
    /// Whether the round trip succeeded
    pub success: bool,

    /// The extracted value; meaningless when `success` is false
    pub value: Value,

    /// Raw response text from the underlying capability
    pub raw_response: String,

    /// Failure detail when `success` is false
    pub error: Option<String>,
}

impl ExtractResult {
    /// Successful round trip
    pub fn ok(value: Value, raw_response: impl Into<String>) -> Self {
        Self {
            success: true,
            value,
            raw_response: raw_response.into(),
            error: None,
        }
    }

    /// Failed round trip
    pub fn failure(error: impl Into<String>, raw_response: impl Into<String>) -> Self {
        Self {
            success: false,
            value: Value::Null,
            raw_response: raw_response.into(),
            error: Some(error.into()),
        }
    }
}
