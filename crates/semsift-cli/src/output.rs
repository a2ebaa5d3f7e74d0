//! Sectioned console output for harness runs

use serde_json::Value;

const WIDTH: usize = 80;

/// Print a titled section with clear delimiters
pub fn print_section(title: &str, content: &str) {
    println!("\n{}", "=".repeat(WIDTH));
    println!("{:=^WIDTH$}", format!(" {} ", title));
    println!("{}", "=".repeat(WIDTH));
    println!("{}", content);
    println!("{}", "=".repeat(WIDTH));
}

/// Render a JSON value for display, pretty-printing structured data
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_string_verbatim() {
        assert_eq!(render_value(&json!("plain text")), "plain text");
    }

    #[test]
    fn test_render_object_pretty() {
        let rendered = render_value(&json!({"a": 1}));
        assert!(rendered.contains("\"a\": 1"));
    }
}
