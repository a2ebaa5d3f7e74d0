//! TOML run-file loading for the harness

use anyhow::{bail, Context, Result};
use semsift_domain::ResponseFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_endpoint() -> String {
    semsift_llm::ollama::DEFAULT_ENDPOINT.to_string()
}

/// One extraction run: service coordinates plus the extraction request
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// Ollama API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model to use (e.g. "llama3")
    pub model: String,

    /// Inline content to mine
    pub input: Option<String>,

    /// Path to a file holding the content; takes precedence over `input`
    pub input_file: Option<PathBuf>,

    /// Natural-language extraction instruction
    pub instruction: String,

    /// Expected response format
    #[serde(default)]
    pub format: ResponseFormat,
}

impl RunConfig {
    /// Load a run file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read run file {}", path.display()))?;
        let config: RunConfig = toml::from_str(&text)
            .with_context(|| format!("failed to parse run file {}", path.display()))?;
        debug!(path = %path.display(), model = %config.model, "run file loaded");
        Ok(config)
    }

    /// Resolve the content to mine
    ///
    /// Structured JSON input is handed to the iterator as a JSON value so
    /// already-structured runs hit the short-circuit path; anything else is
    /// passed through as text.
    pub fn input_content(&self) -> Result<Value> {
        let text = if let Some(path) = &self.input_file {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read input file {}", path.display()))?
        } else if let Some(input) = &self.input {
            input.clone()
        } else {
            bail!("run file must set either `input` or `input_file`");
        };

        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_run_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
model = "llama3"
input = "Cardinals and jays are common backyard birds."
instruction = "extract each bird"
"#
        )
        .unwrap();

        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.format, ResponseFormat::Json);
        assert_eq!(config.instruction, "extract each bird");
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let config = RunConfig {
            endpoint: default_endpoint(),
            model: "llama3".to_string(),
            input: None,
            input_file: None,
            instruction: "extract".to_string(),
            format: ResponseFormat::Json,
        };
        assert!(config.input_content().is_err());
    }

    #[test]
    fn test_structured_input_parses_to_json() {
        let config = RunConfig {
            endpoint: default_endpoint(),
            model: "llama3".to_string(),
            input: Some(r#"{"items": [1, 2]}"#.to_string()),
            input_file: None,
            instruction: "extract".to_string(),
            format: ResponseFormat::Json,
        };
        let content = config.input_content().unwrap();
        assert!(content.is_object());
    }

    #[test]
    fn test_free_text_input_stays_text() {
        let config = RunConfig {
            endpoint: default_endpoint(),
            model: "llama3".to_string(),
            input: Some("just some prose".to_string()),
            input_file: None,
            instruction: "extract".to_string(),
            format: ResponseFormat::Json,
        };
        let content = config.input_content().unwrap();
        assert_eq!(content, Value::String("just some prose".to_string()));
    }
}
