//! Prompt templates for the three AI contracts.

use crate::error::Result;

use super::provider::{FixRequest, RecommendRequest};

/// The four rule templates, as listed in every rule prompt.
const RULE_TEMPLATES: &str = r#"- { "type": "coRun", "tasks": ["T1", "T2"] }
- { "type": "slotRestriction", "workerGroup": "A", "minSlots": 2 }
- { "type": "loadLimit", "workerGroup": "A", "maxSlots": 3 }
- { "type": "phaseWindow", "taskId": "T1", "allowedPhases": [1,2,3] }"#;

/// Build a prompt asking for a corrected cell value.
pub fn fix_prompt(request: &FixRequest) -> Result<String> {
    let row = serde_json::to_string_pretty(&request.row_data)?;
    Ok(format!(
        r#"You are a data correction assistant. A user has the following error in their {} data:
Row: {}
Column: {}
Current Value: {}
Error: {}
Suggest a corrected value for this cell (just the value, no explanation). If the value should be empty, reply with ""."#,
        request.entity_type, row, request.col, request.value, request.message
    ))
}

/// Build a prompt asking for new rule recommendations.
pub fn recommend_prompt(request: &RecommendRequest) -> Result<String> {
    let data = serde_json::to_string_pretty(&request.data)?;
    let rules = serde_json::to_string_pretty(&request.rules)?;
    Ok(format!(
        r#"You are an expert in scheduling and resource allocation. Analyze the following data and existing rules. Suggest up to 3 new business rules that could improve efficiency, fairness, or error prevention. Use these templates:
{}

If no new rules are needed, reply with an empty array.

DATA:
{}

EXISTING RULES:
{}

Your response: JSON array of rule objects only. Return ONLY the JSON array, no other text."#,
        RULE_TEMPLATES, data, rules
    ))
}

/// Build a prompt converting a user instruction into one rule.
pub fn nl_rule_prompt(text: &str) -> String {
    format!(
        r#"You are an expert in business rules for resource allocation.
Given this instruction from a user, convert it to a JSON rule object matching one of these templates:
{}
If the rule doesn't fit, use your best judgment to create a similar object.
The output MUST be only the JSON object, with no other text or markdown formatting.
User instruction: {}
JSON rule object:"#,
        RULE_TEMPLATES, text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityKind;

    #[test]
    fn test_fix_prompt_mentions_cell() {
        let request = FixRequest {
            row: 1,
            col: "Duration".into(),
            value: "0".into(),
            message: "Duration must be at least 1.".into(),
            row_data: serde_json::json!({"TaskID": "T4", "Duration": "0"}),
            entity_type: EntityKind::Tasks,
        };
        let prompt = fix_prompt(&request).unwrap();
        assert!(prompt.contains("error in their tasks data"));
        assert!(prompt.contains("Column: Duration"));
        assert!(prompt.contains("\"TaskID\": \"T4\""));
    }

    #[test]
    fn test_rule_prompts_list_templates() {
        let prompt = nl_rule_prompt("T1 and T2 must run together");
        assert!(prompt.contains("\"type\": \"phaseWindow\""));
        assert!(prompt.ends_with("JSON rule object:"));

        let prompt = recommend_prompt(&RecommendRequest::default()).unwrap();
        assert!(prompt.contains("\"type\": \"coRun\""));
        assert!(prompt.contains("EXISTING RULES:\n[]"));
    }
}
