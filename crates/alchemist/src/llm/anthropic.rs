//! Anthropic Claude API gateway.

use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AlchemistError, Result};
use crate::rules::Rule;

use super::provider::{AiGateway, FixRequest, LlmConfig, RecommendRequest};
use super::{http, postprocess, prompts};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Claude via the Messages API.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    config: LlmConfig,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, LlmConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Result<Self> {
        Ok(Self {
            client: http::client(&config)?,
            api_key: api_key.into(),
            config,
        })
    }

    /// Key from `ANTHROPIC_API_KEY`.
    pub fn from_env(config: LlmConfig) -> Result<Self> {
        Self::with_config(http::key_from_env(API_KEY_VAR)?, config)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        http::json_headers("x-api-key", &self.api_key, &[("anthropic-version", API_VERSION)])
    }

    /// One user turn; returns the first text block of the reply.
    fn complete(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model_or(DEFAULT_MODEL),
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let reply: MessagesReply = http::post_json(&self.client, API_URL, self.build_headers()?, &body)?;
        reply
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .ok_or_else(|| AlchemistError::Llm("No text in API response".to_string()))
    }
}

impl AiGateway for AnthropicProvider {
    fn suggest_fix(&self, request: &FixRequest) -> Result<String> {
        let prompt = prompts::fix_prompt(request)?;
        let response = self.complete(&prompt)?;
        Ok(postprocess::clean_suggestion(&response))
    }

    fn recommend_rules(&self, request: &RecommendRequest) -> Result<Vec<Rule>> {
        let prompt = prompts::recommend_prompt(request)?;
        let response = self.complete(&prompt)?;
        Ok(postprocess::parse_recommendations(&response))
    }

    fn nl_to_rule(&self, text: &str) -> Result<Rule> {
        let response = self.complete(&prompts::nl_rule_prompt(text))?;
        postprocess::extract_json_object(&response).map(Rule::from_value)
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    content: Vec<TextBlock>,
}

#[derive(Debug, Deserialize)]
struct TextBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}
