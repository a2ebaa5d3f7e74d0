//! Semsift Extraction Service Layer
//!
//! Pluggable implementations of the `ExtractionService` trait from
//! `semsift-domain`.
//!
//! # Providers
//!
//! - `MockService`: Deterministic mock for testing
//! - `OllamaService`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use semsift_llm::MockService;
//! use semsift_domain::{ExtractionService, ResponseFormat};
//! use serde_json::json;
//!
//! # async fn example() {
//! let service = MockService::new(r#"[{"a": 1}]"#);
//! let result = service
//!     .extract(&json!("some content"), "extract everything", ResponseFormat::Json)
//!     .await;
//! assert!(result.success);
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;

use semsift_domain::{ExtractResult, ExtractionService, ResponseFormat};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaService;

/// Errors that can occur inside a service implementation
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One scripted reply held by a `MockService`
#[derive(Debug, Clone)]
enum ScriptedReply {
    Text(String),
    Structured(Value),
    Failure(String),
}

/// Mock extraction service for deterministic testing
///
/// Replies are served from a FIFO script: each `extract` call consumes the
/// next scripted reply, falling back to the default response once the script
/// is exhausted. Every prompt is recorded so tests can assert on phrasing
/// and call counts.
///
/// # Examples
///
/// ```
/// use semsift_llm::MockService;
/// use semsift_domain::{ExtractionService, ResponseFormat};
/// use serde_json::json;
///
/// # async fn example() {
/// let service = MockService::new("fallback");
/// service.push_response(r#"{"x": 1}"#);
/// service.push_failure("connection reset");
///
/// let first = service.extract(&json!("c"), "p1", ResponseFormat::Json).await;
/// assert!(first.success);
///
/// let second = service.extract(&json!("c"), "p2", ResponseFormat::Json).await;
/// assert!(!second.success);
///
/// assert_eq!(service.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockService {
    default_response: String,
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    /// Create a mock that answers every call with a fixed textual response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a textual reply for the next unscripted call
    pub fn push_response(&self, response: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Text(response.into()));
    }

    /// Queue an already-structured reply
    pub fn push_structured(&self, value: Value) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Structured(value));
    }

    /// Queue a transport-level failure
    pub fn push_failure(&self, error: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Failure(error.into()));
    }

    /// Number of `extract` calls observed so far
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// All prompts observed so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl ExtractionService for MockService {
    async fn extract(
        &self,
        _content: &Value,
        prompt: &str,
        _format: ResponseFormat,
    ) -> ExtractResult {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Text(text)) => {
                ExtractResult::ok(Value::String(text.clone()), text)
            }
            Some(ScriptedReply::Structured(value)) => {
                let raw = value.to_string();
                ExtractResult::ok(value, raw)
            }
            Some(ScriptedReply::Failure(error)) => ExtractResult::failure(error, ""),
            None => ExtractResult::ok(
                Value::String(self.default_response.clone()),
                self.default_response.clone(),
            ),
        }
    }
}
