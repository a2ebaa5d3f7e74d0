//! Error types for the iterator core

use thiserror::Error;

/// Errors raised across the iterator boundary
///
/// Per-call service and parse failures during iteration are never raised;
/// they are absorbed into stream exhaustion with diagnostics retained in
/// `ExtractionState`. Only construction-time problems surface here.
#[derive(Error, Debug)]
pub enum IteratorError {
    /// No usable extraction service or strategy at construction
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The iterator's private scheduling context could not be created
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<std::io::Error> for IteratorError {
    fn from(e: std::io::Error) -> Self {
        IteratorError::Runtime(e.to_string())
    }
}
