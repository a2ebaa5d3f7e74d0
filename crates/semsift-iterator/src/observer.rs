//! Observation hooks for iteration state transitions
//!
//! Instead of scattering log calls through control flow, the factory and
//! iterator report transitions to an injected observer, so tests can assert
//! on exact transition sequences deterministically.

use crate::state::ExtractionMode;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// One well-defined transition in the iteration state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEvent {
    /// A strategy was marked attempted
    ModeAttempted(ExtractionMode),
    /// The active strategy changed (fast-to-slow fallback)
    ModeSwitched {
        /// Strategy that was abandoned
        from: ExtractionMode,
        /// Strategy now driving iteration
        to: ExtractionMode,
        /// Why the switch happened (service failure, unparseable response,
        /// or an empty bulk result)
        reason: String,
    },
    /// An item was produced at the given position
    ItemYielded {
        /// 0-based position of the yielded item
        position: usize,
    },
    /// The stream terminated; `clean` is false when an error was recorded
    StreamExhausted {
        /// True for sentinel/cache exhaustion, false for service/parse failure
        clean: bool,
    },
}

/// Callback invoked at well-defined transition points
pub trait IterationObserver: Send + Sync {
    /// Handle one transition event
    fn on_transition(&self, event: &TransitionEvent);
}

/// Default observer that forwards transitions to `tracing`
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IterationObserver for TracingObserver {
    fn on_transition(&self, event: &TransitionEvent) {
        match event {
            TransitionEvent::ModeAttempted(mode) => {
                info!(mode = %mode, "extraction mode attempted");
            }
            TransitionEvent::ModeSwitched { from, to, reason } => {
                info!(from = %from, to = %to, reason = %reason, "extraction mode switched");
            }
            TransitionEvent::ItemYielded { position } => {
                debug!(position, "item yielded");
            }
            TransitionEvent::StreamExhausted { clean: true } => {
                debug!("stream exhausted");
            }
            TransitionEvent::StreamExhausted { clean: false } => {
                warn!("stream exhausted after failure");
            }
        }
    }
}

/// Observer that records every transition, for test assertions
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<TransitionEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All transitions observed so far, in order
    pub fn events(&self) -> Vec<TransitionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl IterationObserver for RecordingObserver {
    fn on_transition(&self, event: &TransitionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
