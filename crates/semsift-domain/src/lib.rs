//! Semsift Domain Layer
//!
//! This crate contains the shared vocabulary of the semsift extraction
//! pipeline: the configuration callers hand to an iterator, the result shape
//! an extraction service returns, and the trait interface that separates the
//! iterator core from any concrete LLM backend.
//!
//! ## Key Concepts
//!
//! - **ExtractConfig**: What to extract - instruction text, expected response
//!   format, and advisory validation metadata
//! - **ExtractResult**: One service round trip - success flag, opaque value,
//!   raw response text, optional error
//! - **ExtractionService**: The single async operation the iterator core
//!   consumes; providers live in other crates
//!
//! ## Architecture
//!
//! Items and content are `serde_json::Value` throughout - the domain treats
//! them as opaque structured data and never inspects their semantics.
//! Infrastructure implementations (HTTP providers, mocks) live in
//! `semsift-llm`; the state machine lives in `semsift-iterator`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(async_fn_in_trait)]

pub mod config;
pub mod result;
pub mod traits;

// Re-exports for convenience
pub use config::{ExtractConfig, ResponseFormat, ValidationRules};
pub use result::ExtractResult;
pub use traits::ExtractionService;
