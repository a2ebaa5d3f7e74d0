//! Extraction configuration handed to an iterator

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Expected shape of an extraction response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Structured JSON (the default)
    #[default]
    Json,
    /// Free-form text
    Text,
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseFormat::Json => write!(f, "json"),
            ResponseFormat::Text => write!(f, "text"),
        }
    }
}

/// Advisory structural validation metadata
///
/// `required_fields` is surfaced for logging and test assertions; it is never
/// enforced by blocking extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Field names each extracted item is expected to carry
    #[serde(default)]
    pub required_fields: BTreeSet<String>,
}

impl ValidationRules {
    /// True when no rules are configured
    pub fn is_empty(&self) -> bool {
        self.required_fields.is_empty()
    }
}

/// Configuration for one extraction run
///
/// Immutable for the lifetime of the iterator it is handed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Natural-language description of what to extract
    pub instruction: String,

    /// Expected response format
    #[serde(default)]
    pub format: ResponseFormat,

    /// Advisory validation rules
    #[serde(default)]
    pub validation: ValidationRules,
}

impl ExtractConfig {
    /// Create a config with the given instruction and default format (JSON)
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            format: ResponseFormat::default(),
            validation: ValidationRules::default(),
        }
    }

    /// Set the expected response format
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the advisory required fields
    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validation.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_json() {
        let config = ExtractConfig::new("extract each record");
        assert_eq!(config.format, ResponseFormat::Json);
        assert!(config.validation.is_empty());
    }

    #[test]
    fn test_with_required_fields() {
        let config = ExtractConfig::new("extract each change")
            .with_required_fields(["file_path", "content"]);
        assert_eq!(config.validation.required_fields.len(), 2);
        assert!(config.validation.required_fields.contains("file_path"));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ResponseFormat::Json.to_string(), "json");
        assert_eq!(ResponseFormat::Text.to_string(), "text");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{"instruction": "extract each bird"}"#).unwrap();
        assert_eq!(config.instruction, "extract each bird");
        assert_eq!(config.format, ResponseFormat::Json);
        assert!(config.validation.is_empty());
    }
}
