//! Prompt engineering for bulk and per-item extraction

use crate::parser::SENTINEL;
use semsift_domain::ExtractConfig;
use serde_json::Value;

/// Builds prompts for the extraction service
pub struct PromptBuilder<'a> {
    content: &'a Value,
    config: &'a ExtractConfig,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder for one (content, config) pair
    pub fn new(content: &'a Value, config: &'a ExtractConfig) -> Self {
        Self { content, config }
    }

    /// Build the bulk prompt asking for the complete item sequence at once
    pub fn bulk(&self) -> String {
        format!(
            "Extract all items matching these requirements:\n\n\
             Content to analyze:\n---\n{}\n---\n\n\
             Extraction instructions:\n{}\n\n\
             Return format: {}\n\n\
             {}",
            render_content(self.content),
            self.config.instruction,
            self.config.format,
            BULK_OUTPUT_REMINDER,
        )
    }

    /// Build the per-item prompt for the item at `position` (0-based)
    pub fn item(&self, position: usize) -> String {
        format!(
            "Extract the {} item matching these requirements:\n\n\
             Content to analyze:\n---\n{}\n---\n\n\
             Extraction instructions:\n{}\n\n\
             Return format: {}\n\n\
             Return ONLY the single matching item, with no additional text.\n\
             If no more items exist, respond with exactly: {}",
            ordinal(position + 1),
            render_content(self.content),
            self.config.instruction,
            self.config.format,
            SENTINEL,
        )
    }
}

const BULK_OUTPUT_REMINDER: &str = "Return ONLY a JSON array containing every matching item, \
with no additional text, no markdown code blocks, no explanations. \
Return an empty array [] if nothing matches.";

/// Render content for embedding into a prompt
///
/// Strings are embedded as-is; structured values are pretty-printed JSON.
fn render_content(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Format a 1-based ordinal label using English suffix rules
///
/// Values whose remainder mod 100 falls in [11, 20] take "th"; otherwise the
/// suffix follows the remainder mod 10.
pub fn ordinal(n: usize) -> String {
    let suffix = if (11..=20).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ordinal_suffixes() {
        // Positions 0, 9, 10, 11, 12, 20, 99 map to these labels
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(10), "10th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(100), "100th");
    }

    #[test]
    fn test_ordinal_teens_rule_wraps_mod_100() {
        assert_eq!(ordinal(111), "111th");
        assert_eq!(ordinal(112), "112th");
        assert_eq!(ordinal(121), "121st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn test_item_prompt_contains_ordinal_and_sentinel() {
        let content = json!("alpha beta gamma");
        let config = ExtractConfig::new("extract each greek letter");
        let prompt = PromptBuilder::new(&content, &config).item(0);

        assert!(prompt.contains("Extract the 1st item"));
        assert!(prompt.contains("alpha beta gamma"));
        assert!(prompt.contains("extract each greek letter"));
        assert!(prompt.contains("NO_MORE_ITEMS"));
    }

    #[test]
    fn test_bulk_prompt_contains_instruction_and_content() {
        let content = json!({"doc": "some text"});
        let config = ExtractConfig::new("extract each record");
        let prompt = PromptBuilder::new(&content, &config).bulk();

        assert!(prompt.contains("extract each record"));
        assert!(prompt.contains("\"doc\""));
        assert!(prompt.contains("JSON array"));
        assert!(prompt.contains("Return format: json"));
    }

    #[test]
    fn test_string_content_embedded_verbatim() {
        let content = json!("name,category\ncardinal,songbird");
        let config = ExtractConfig::new("extract each bird");
        let prompt = PromptBuilder::new(&content, &config).bulk();

        assert!(prompt.contains("name,category\ncardinal,songbird"));
    }
}
