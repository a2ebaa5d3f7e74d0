//! The iterator factory and the item iterator it produces

use crate::error::IteratorError;
use crate::observer::{IterationObserver, TracingObserver, TransitionEvent};
use crate::parser;
use crate::prompt::{ordinal, PromptBuilder};
use crate::state::{ExtractionMode, ExtractionState};
use semsift_domain::{ExtractConfig, ExtractionService, ResponseFormat};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builder for `SemanticIterator`
///
/// Requires an extraction service; an empty strategy list defaults to
/// `[Fast]`.
pub struct SemanticIteratorBuilder<S> {
    service: Option<S>,
    modes: Vec<ExtractionMode>,
    allow_fallback: bool,
    observer: Option<Arc<dyn IterationObserver>>,
}

impl<S: ExtractionService> SemanticIteratorBuilder<S> {
    fn new() -> Self {
        Self {
            service: None,
            modes: Vec::new(),
            allow_fallback: true,
            observer: None,
        }
    }

    /// Set the extraction service handle
    pub fn service(mut self, service: S) -> Self {
        self.service = Some(service);
        self
    }

    /// Append a candidate strategy; duplicates are ignored
    pub fn mode(mut self, mode: ExtractionMode) -> Self {
        if !self.modes.contains(&mode) {
            self.modes.push(mode);
        }
        self
    }

    /// Enable or disable fast-to-slow fallback (enabled by default)
    pub fn allow_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    /// Install an observer for state transitions
    pub fn observer(mut self, observer: Arc<dyn IterationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the factory
    ///
    /// # Errors
    ///
    /// `IteratorError::Configuration` when no extraction service was supplied.
    pub fn build(self) -> Result<SemanticIterator<S>, IteratorError> {
        let service = self.service.ok_or_else(|| {
            IteratorError::Configuration("an extraction service is required".to_string())
        })?;

        let modes = if self.modes.is_empty() {
            vec![ExtractionMode::Fast]
        } else {
            self.modes
        };

        info!(modes = ?modes, allow_fallback = self.allow_fallback, "iterator factory configured");

        Ok(SemanticIterator {
            service: Arc::new(service),
            modes,
            allow_fallback: self.allow_fallback,
            observer: self
                .observer
                .unwrap_or_else(|| Arc::new(TracingObserver)),
        })
    }
}

/// Factory producing configured item iterators
///
/// Holds the ordered candidate strategies, the fallback policy, and the
/// extraction service handle. The handle is stateless per call and shared
/// across every iterator this factory creates.
pub struct SemanticIterator<S> {
    service: Arc<S>,
    modes: Vec<ExtractionMode>,
    allow_fallback: bool,
    observer: Arc<dyn IterationObserver>,
}

impl<S: ExtractionService> SemanticIterator<S> {
    /// Start building a factory
    pub fn builder() -> SemanticIteratorBuilder<S> {
        SemanticIteratorBuilder::new()
    }

    /// Produce a ready-to-use iterator over items extracted from `content`
    ///
    /// Already-structured content short-circuits the fast path with zero
    /// service calls. Otherwise, when fast mode is configured, one bulk call
    /// is made here; when it yields nothing the factory falls back to slow
    /// mode (if configured and allowed) or returns an empty iterator. Slow
    /// mode performs its first per-item call lazily, on the first `next`.
    ///
    /// # Errors
    ///
    /// `IteratorError::Runtime` when the iterator's private scheduling
    /// context cannot be created. Per-call extraction failures never surface
    /// here; they are absorbed into iteration state.
    pub fn iterate(
        &self,
        content: Value,
        config: ExtractConfig,
    ) -> Result<ItemIterator<S>, IteratorError> {
        // Each iterator owns its scheduling context; never shared
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        if !config.validation.is_empty() {
            // Advisory only; surfaced for inspection, never enforced
            debug!(required_fields = ?config.validation.required_fields, "validation rules configured");
        }

        let mut state = ExtractionState::new(content, config, self.modes[0]);

        // Already-structured input resolves the fast path with zero calls
        if let Some(items) = parser::direct_items(&state.content) {
            state.current_mode = ExtractionMode::Fast;
            self.mark_attempted(&mut state, ExtractionMode::Fast);
            info!(count = items.len(), "items taken directly from structured content");
            state.items = items;
            return Ok(ItemIterator::new(
                Arc::clone(&self.service),
                runtime,
                state,
                Arc::clone(&self.observer),
            ));
        }

        if self.modes.contains(&ExtractionMode::Fast) {
            state.current_mode = ExtractionMode::Fast;
            self.mark_attempted(&mut state, ExtractionMode::Fast);

            let prompt = PromptBuilder::new(&state.content, &state.config).bulk();
            debug!(prompt_len = prompt.len(), "bulk extraction attempt");
            let result = runtime.block_on(self.service.extract(
                &state.content,
                &prompt,
                ResponseFormat::Json,
            ));
            state.raw_response = result.raw_response.clone();

            let outcome = if result.success {
                parser::parse_bulk(&result.value)
            } else {
                Err(result
                    .error
                    .unwrap_or_else(|| "extraction service reported failure".to_string()))
            };

            match outcome {
                Ok(items) if !items.is_empty() => {
                    info!(count = items.len(), "bulk extraction succeeded");
                    state.items = items;
                }
                Ok(_) => self.fall_back(&mut state, "bulk extraction returned no items"),
                Err(reason) => self.fall_back(&mut state, &reason),
            }
        } else {
            // Slow-only: the first per-item call happens on the first next
            state.current_mode = ExtractionMode::Slow;
            self.mark_attempted(&mut state, ExtractionMode::Slow);
        }

        Ok(ItemIterator::new(
            Arc::clone(&self.service),
            runtime,
            state,
            Arc::clone(&self.observer),
        ))
    }

    fn mark_attempted(&self, state: &mut ExtractionState, mode: ExtractionMode) {
        state.attempted_modes.push(mode);
        self.observer
            .on_transition(&TransitionEvent::ModeAttempted(mode));
    }

    fn fall_back(&self, state: &mut ExtractionState, reason: &str) {
        if self.allow_fallback && self.modes.contains(&ExtractionMode::Slow) {
            info!(reason, "falling back to slow extraction");
            state.current_mode = ExtractionMode::Slow;
            state.switch_reason = Some(reason.to_string());
            self.observer.on_transition(&TransitionEvent::ModeSwitched {
                from: ExtractionMode::Fast,
                to: ExtractionMode::Slow,
                reason: reason.to_string(),
            });
            self.mark_attempted(state, ExtractionMode::Slow);
        } else {
            // Stays in fast mode with an empty cache; terminates immediately
            info!(reason, "no fallback available, iterator will be empty");
        }
    }
}

/// Iterator over extracted items with inspectable state
///
/// Implements `std::iter::Iterator`; termination (clean or after an absorbed
/// failure) surfaces as `None`. Callers wanting to distinguish the two must
/// inspect `state()` after exhaustion. Restarting means asking the factory
/// for a new iterator; there is no reset.
pub struct ItemIterator<S: ExtractionService> {
    service: Arc<S>,
    runtime: tokio::runtime::Runtime,
    state: ExtractionState,
    observer: Arc<dyn IterationObserver>,
    done: bool,
}

impl<S: ExtractionService> ItemIterator<S> {
    fn new(
        service: Arc<S>,
        runtime: tokio::runtime::Runtime,
        state: ExtractionState,
        observer: Arc<dyn IterationObserver>,
    ) -> Self {
        debug!(
            mode = %state.current_mode,
            items_cached = state.items.len(),
            "iterator ready"
        );
        Self {
            service,
            runtime,
            state,
            observer,
            done: false,
        }
    }

    /// Full extraction state, retained after termination for diagnostics
    pub fn state(&self) -> &ExtractionState {
        &self.state
    }

    /// Strategy currently driving iteration
    pub fn current_mode(&self) -> ExtractionMode {
        self.state.current_mode
    }

    /// Strategies attempted so far, in order
    pub fn attempted_modes(&self) -> &[ExtractionMode] {
        &self.state.attempted_modes
    }

    /// Most recent raw service response
    pub fn raw_response(&self) -> &str {
        &self.state.raw_response
    }

    /// Diagnostic recorded when the stream ended on a failure
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Why fast mode was abandoned, when a fallback occurred
    pub fn switch_reason(&self) -> Option<&str> {
        self.state.switch_reason.as_deref()
    }

    fn step_fast(&mut self) -> Option<Value> {
        if self.state.position < self.state.items.len() {
            let item = self.state.items[self.state.position].clone();
            self.state.position += 1;
            self.observer.on_transition(&TransitionEvent::ItemYielded {
                position: self.state.position - 1,
            });
            Some(item)
        } else {
            self.finish(true)
        }
    }

    fn step_slow(&mut self) -> Option<Value> {
        let prompt =
            PromptBuilder::new(&self.state.content, &self.state.config).item(self.state.position);
        debug!(position = self.state.position, "per-item extraction call");

        // Exactly one outstanding call, driven to completion before returning
        let result = self.runtime.block_on(self.service.extract(
            &self.state.content,
            &prompt,
            self.state.config.format,
        ));
        self.state.raw_response = result.raw_response;

        if !result.success {
            let detail = result
                .error
                .unwrap_or_else(|| "extraction service reported failure".to_string());
            warn!(error = %detail, "per-item extraction call failed");
            self.state.error = Some(detail);
            return self.finish(false);
        }

        if parser::is_sentinel(&result.value) {
            debug!(position = self.state.position, "sentinel observed");
            return self.finish(true);
        }

        match parser::parse_item(&result.value) {
            Ok(item) => {
                self.state.position += 1;
                self.observer.on_transition(&TransitionEvent::ItemYielded {
                    position: self.state.position - 1,
                });
                Some(item)
            }
            Err(reason) => {
                let detail = format!(
                    "failed to parse {} item: {}",
                    ordinal(self.state.position + 1),
                    reason
                );
                warn!(error = %detail, "per-item response unparseable");
                self.state.error = Some(detail);
                self.finish(false)
            }
        }
    }

    fn finish(&mut self, clean: bool) -> Option<Value> {
        self.done = true;
        self.observer
            .on_transition(&TransitionEvent::StreamExhausted { clean });
        None
    }
}

impl<S: ExtractionService> Iterator for ItemIterator<S> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.done {
            return None;
        }
        match self.state.current_mode {
            ExtractionMode::Fast => self.step_fast(),
            ExtractionMode::Slow => self.step_slow(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semsift_llm::MockService;

    #[test]
    fn test_build_requires_service() {
        let result = SemanticIterator::<MockService>::builder().build();
        assert!(matches!(result, Err(IteratorError::Configuration(_))));
    }

    #[test]
    fn test_empty_modes_default_to_fast() {
        let factory = SemanticIterator::builder()
            .service(MockService::new("[]"))
            .build()
            .unwrap();
        assert_eq!(factory.modes, vec![ExtractionMode::Fast]);
    }

    #[test]
    fn test_duplicate_modes_collapse() {
        let factory = SemanticIterator::builder()
            .service(MockService::new("[]"))
            .mode(ExtractionMode::Fast)
            .mode(ExtractionMode::Fast)
            .mode(ExtractionMode::Slow)
            .build()
            .unwrap();
        assert_eq!(
            factory.modes,
            vec![ExtractionMode::Fast, ExtractionMode::Slow]
        );
    }
}
