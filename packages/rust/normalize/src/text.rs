//! Coercion of raw JSON field values into text and lists.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.?\d*").unwrap());

/// Render a raw field as trimmed text. Lists are joined with `separator`.
pub fn field_text(value: &Value, separator: &str) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(separator)
            .trim()
            .to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Split a raw field into trimmed, non-empty items.
///
/// Strings split on commas; lists are taken item by item.
pub fn field_items(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_commas(s),
        Value::Array(items) => items
            .iter()
            .map(|item| scalar_text(item).trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

/// Split on commas, trimming entries and dropping empty ones.
pub fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// First decimal number appearing in `text`.
pub fn first_number(text: &str) -> Option<f64> {
    NUMBER_RE
        .find(text)
        .and_then(|m| m.as_str().trim_end_matches('.').parse().ok())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_from_strings_lists_and_numbers() {
        assert_eq!(field_text(&json!("  Glow Serum "), ", "), "Glow Serum");
        assert_eq!(field_text(&json!(["Apply", "daily"]), " "), "Apply daily");
        assert_eq!(field_text(&json!(25), ", "), "25");
        assert_eq!(field_text(&Value::Null, ", "), "");
    }

    #[test]
    fn items_drop_empty_entries() {
        assert_eq!(field_items(&json!("Oily, , Combination,")), vec!["Oily", "Combination"]);
        assert_eq!(field_items(&json!(["Zinc", " "])), vec!["Zinc"]);
        assert!(field_items(&json!("")).is_empty());
    }

    #[test]
    fn first_number_handles_decimals_and_trailing_dots() {
        assert_eq!(first_number("10% Vitamin C"), Some(10.0));
        assert_eq!(first_number("₹699.50 per bottle"), Some(699.5));
        assert_eq!(first_number("Price: 25."), Some(25.0));
        assert_eq!(first_number("free"), None);
    }
}
