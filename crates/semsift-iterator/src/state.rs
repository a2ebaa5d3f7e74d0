//! Extraction modes and per-iterator state tracking

use semsift_domain::ExtractConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Available extraction strategies, from fastest to slowest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Entire item sequence in one round trip (or zero, when the input is
    /// already structured), served from an in-memory cache
    Fast,
    /// One item per round trip by ordinal position; the fallback strategy
    Slow,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMode::Fast => write!(f, "fast"),
            ExtractionMode::Slow => write!(f, "slow"),
        }
    }
}

/// Mutable record of one in-progress extraction
///
/// Created per `iterate` call, exclusively owned by one `ItemIterator`, and
/// discarded with it. Retained after termination so callers can distinguish
/// clean completion from failure.
#[derive(Debug)]
pub struct ExtractionState {
    pub(crate) current_mode: ExtractionMode,
    pub(crate) attempted_modes: Vec<ExtractionMode>,
    pub(crate) items: Vec<Value>,
    pub(crate) position: usize,
    pub(crate) raw_response: String,
    pub(crate) error: Option<String>,
    pub(crate) switch_reason: Option<String>,
    pub(crate) content: Value,
    pub(crate) config: ExtractConfig,
}

impl ExtractionState {
    pub(crate) fn new(content: Value, config: ExtractConfig, initial_mode: ExtractionMode) -> Self {
        Self {
            current_mode: initial_mode,
            attempted_modes: Vec::new(),
            items: Vec::new(),
            position: 0,
            raw_response: String::new(),
            error: None,
            switch_reason: None,
            content,
            config,
        }
    }

    /// Strategy currently driving iteration
    pub fn current_mode(&self) -> ExtractionMode {
        self.current_mode
    }

    /// Append-only log of strategies tried, in order
    pub fn attempted_modes(&self) -> &[ExtractionMode] {
        &self.attempted_modes
    }

    /// Cached items (fast mode only; empty in slow mode)
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Cursor position; never decreases
    pub fn position(&self) -> usize {
        self.position
    }

    /// Most recent raw text received from the extraction service
    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }

    /// Diagnostic set on unrecoverable parse/service failure; `None` after
    /// clean sentinel-based termination
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Why fast mode was abandoned; `None` when no fallback occurred
    pub fn switch_reason(&self) -> Option<&str> {
        self.switch_reason.as_deref()
    }

    /// The content being mined; never mutated
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Extraction configuration for this run
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }
}
