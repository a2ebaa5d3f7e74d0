//! Semsift Iterator
//!
//! Dual-mode semantic extraction iterator: turns an arbitrary content blob
//! plus a natural-language instruction into an ordered, lazily-produced
//! sequence of structured items, delegating the understanding work to an
//! `ExtractionService`.
//!
//! # Overview
//!
//! Two strategies are available. **Fast** obtains the entire item sequence in
//! a single round trip (or zero, when the input is already structured) and
//! serves it from a cache. **Slow** asks for one item at a time by ordinal
//! position ("extract the 3rd item...") until the service answers with the
//! `NO_MORE_ITEMS` sentinel. When a bulk fast attempt yields nothing, the
//! factory can fall back to slow mode.
//!
//! # Architecture
//!
//! ```text
//! SemanticIterator (factory) → ItemIterator → ExtractionService
//!                               state machine: fast cache | slow per-item
//! ```
//!
//! The public iteration contract is plain and synchronous: `ItemIterator`
//! implements `std::iter::Iterator`, and every termination - cache drained,
//! sentinel observed, or failure absorbed - surfaces as `None`. Each iterator
//! privately owns a single-threaded scheduling context that drives exactly
//! one service call at a time; callers never see suspension.
//!
//! # Example
//!
//! ```no_run
//! use semsift_iterator::{ExtractionMode, SemanticIterator};
//! use semsift_domain::ExtractConfig;
//! use semsift_llm::MockService;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), semsift_iterator::IteratorError> {
//! let service = MockService::new(r#"[{"name": "cardinal"}, {"name": "jay"}]"#);
//! let factory = SemanticIterator::builder()
//!     .service(service)
//!     .mode(ExtractionMode::Fast)
//!     .mode(ExtractionMode::Slow)
//!     .build()?;
//!
//! let iter = factory.iterate(
//!     json!("Cardinals and jays are common backyard birds."),
//!     ExtractConfig::new("extract each bird as {\"name\": ...}"),
//! )?;
//!
//! for item in iter {
//!     println!("{}", item);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! After exhaustion, inspect `ItemIterator::state()` to distinguish clean
//! completion from an absorbed failure.

#![warn(missing_docs)]

mod error;
mod iterator;
mod observer;
mod parser;
mod prompt;
mod state;

pub use error::IteratorError;
pub use iterator::{ItemIterator, SemanticIterator, SemanticIteratorBuilder};
pub use observer::{IterationObserver, RecordingObserver, TracingObserver, TransitionEvent};
pub use parser::{RECOGNIZED_KEYS, SENTINEL};
pub use prompt::{ordinal, PromptBuilder};
pub use state::{ExtractionMode, ExtractionState};
