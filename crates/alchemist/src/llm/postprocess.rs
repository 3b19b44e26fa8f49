//! Cleanup of raw model output.
//!
//! Models wrap answers in quotes, markdown fences or chatter. These helpers
//! pull out the part each contract needs and nothing else.

use serde_json::Value;

use crate::error::{AlchemistError, Result};
use crate::rules::Rule;

/// Trim a suggestion and drop one leading and one trailing double quote.
pub fn clean_suggestion(text: &str) -> String {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Contents of the first markdown code block, or the whole text trimmed.
pub fn strip_code_fence(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(str::trim)
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(str::trim)
            .unwrap_or(response)
    } else {
        response.trim()
    }
}

/// Parse the outermost `open ... close` span of `text`.
fn outermost(text: &str, open: char, close: char) -> Option<Value> {
    let body = strip_code_fence(text);
    let start = body.find(open)?;
    let end = body.rfind(close)?;
    if end < start {
        return None;
    }
    serde_json::from_str(&body[start..=end]).ok()
}

/// Extract the outermost JSON array from a response.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    match outermost(text, '[', ']')? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Extract the outermost JSON object from a response.
pub fn extract_json_object(text: &str) -> Result<Value> {
    match outermost(text, '{', '}') {
        Some(value @ Value::Object(_)) => Ok(value),
        _ => Err(AlchemistError::Llm(format!(
            "could not parse a rule object from response: {}",
            preview(text)
        ))),
    }
}

/// Rules recommended in a response; anything that is not an array is none.
pub fn parse_recommendations(text: &str) -> Vec<Rule> {
    extract_json_array(text)
        .unwrap_or_default()
        .into_iter()
        .map(Rule::from_value)
        .collect()
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    let trimmed = text.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_suggestion() {
        assert_eq!(clean_suggestion("  \"3\"\n"), "3");
        assert_eq!(clean_suggestion("\"\""), "");
        assert_eq!(clean_suggestion("T1,T2"), "T1,T2");
        assert_eq!(clean_suggestion("\"a \"quoted\" word\""), "a \"quoted\" word");
    }

    #[test]
    fn test_array_with_nested_arrays() {
        let text = r#"Here you go:
[{"type": "coRun", "tasks": ["T1", "T2"]}, {"type": "phaseWindow", "taskId": "T1", "allowedPhases": [1, 2]}]
Hope this helps."#;
        let items = extract_json_array(text).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["allowedPhases"], json!([1, 2]));
    }

    #[test]
    fn test_array_in_code_fence() {
        let text = "```json\n[{\"type\": \"loadLimit\", \"workerGroup\": \"A\", \"maxSlots\": 3}]\n```";
        let rules = parse_recommendations(text);
        assert_eq!(rules.len(), 1);
        assert!(rules[0].is_known());
    }

    #[test]
    fn test_non_array_is_empty() {
        assert!(parse_recommendations("No new rules needed.").is_empty());
        assert!(parse_recommendations(r#"{"type": "coRun"}"#).is_empty());
        assert!(parse_recommendations("[not json]").is_empty());
        assert!(parse_recommendations("[]").is_empty());
    }

    #[test]
    fn test_object_extraction() {
        let value = extract_json_object("Rule: {\"type\": \"coRun\", \"tasks\": [\"T1\"]}").unwrap();
        assert_eq!(value["type"], "coRun");

        assert!(extract_json_object("[1, 2]").is_err());
        assert!(extract_json_object("sorry, I can't").is_err());
    }
}
