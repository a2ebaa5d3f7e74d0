//! Semsift CLI library.
//!
//! Supports the `semsift` binary: a small harness for exercising the
//! extraction iterator against a live Ollama instance from a TOML run file.

pub mod config;
pub mod output;

pub use config::RunConfig;
