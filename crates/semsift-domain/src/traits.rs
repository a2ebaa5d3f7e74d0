//! Trait definitions for external interactions
//!
//! These traits define the boundary between the iterator core and
//! infrastructure. Provider implementations live in other crates.

use crate::config::ResponseFormat;
use crate::result::ExtractResult;
use serde_json::Value;

/// Trait for the content-understanding capability behind extraction
///
/// One call is one request/response round trip. Implementations own model
/// selection, authentication, retries, and timeouts; the iterator core only
/// sees the `ExtractResult` shape. Per-call failures are reported through
/// `ExtractResult::failure`, never by panicking.
///
/// Implementations must be stateless per call so a single handle can be
/// shared across iterators.
pub trait ExtractionService {
    /// Perform one extraction round trip against `content` using `prompt`
    async fn extract(&self, content: &Value, prompt: &str, format: ResponseFormat)
        -> ExtractResult;
}
