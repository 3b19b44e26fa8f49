//! AI gateway for fix suggestions, rule recommendations and
//! natural-language rule entry.
//!
//! Every call is optional and independently failable. The `*_or_*`
//! wrappers turn failures into neutral outcomes so a missing API key or a
//! flaky network never affects the tables, the rule store or validation.
//!
//! # Supported Providers
//!
//! - **Gemini** - `gemini-1.5-flash` by default (requires `GEMINI_API_KEY`)
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **Mock** - deterministic heuristics, no network

pub mod anthropic;
pub mod gemini;
mod http;
mod mock;
mod postprocess;
mod prompts;
mod provider;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use postprocess::{
    clean_suggestion, extract_json_array, extract_json_object, parse_recommendations,
    strip_code_fence,
};
pub use provider::{AiGateway, FixRequest, LlmConfig, RecommendRequest};

use crate::rules::Rule;

/// Message shown when a rule could not be produced.
pub const RULE_PARSE_FAILURE: &str = "Could not parse rule.";

/// Suggest a fix, or `None` when no suggestion is available.
pub fn suggest_fix_or_none(gateway: &dyn AiGateway, request: &FixRequest) -> Option<String> {
    match gateway.suggest_fix(request) {
        Ok(suggestion) => Some(suggestion),
        Err(e) => {
            tracing::warn!(
                gateway = gateway.name(),
                row = request.row,
                column = %request.col,
                error = %e,
                "fix suggestion unavailable"
            );
            None
        }
    }
}

/// Recommend rules, or none on any failure.
pub fn recommend_rules_or_empty(gateway: &dyn AiGateway, request: &RecommendRequest) -> Vec<Rule> {
    match gateway.recommend_rules(request) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::warn!(gateway = gateway.name(), error = %e, "rule recommendations unavailable");
            Vec::new()
        }
    }
}

/// Convert text to a rule, or a user-facing failure message.
pub fn nl_to_rule_or_message(gateway: &dyn AiGateway, text: &str) -> Result<Rule, String> {
    gateway.nl_to_rule(text).map_err(|e| {
        tracing::warn!(gateway = gateway.name(), error = %e, "natural-language rule failed");
        format!("{} {}", RULE_PARSE_FAILURE, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Dataset, EntityKind};

    #[test]
    fn test_fallbacks_on_failure() {
        let gateway = MockProvider::failing();
        let request = FixRequest {
            row: 0,
            col: "Duration".into(),
            value: "0".into(),
            message: "Duration must be at least 1.".into(),
            row_data: serde_json::Value::Null,
            entity_type: EntityKind::Tasks,
        };

        assert_eq!(suggest_fix_or_none(&gateway, &request), None);
        assert!(recommend_rules_or_empty(&gateway, &RecommendRequest::new(Dataset::new(), vec![])).is_empty());
        let message = nl_to_rule_or_message(&gateway, "T1 with T2").unwrap_err();
        assert!(message.starts_with(RULE_PARSE_FAILURE));
    }

    #[test]
    fn test_passthrough_on_success() {
        let gateway = MockProvider::new();
        let rule = nl_to_rule_or_message(&gateway, "T1 and T2 together").unwrap();
        assert!(rule.is_known());
    }
}
