//! Google Gemini API gateway.

use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AlchemistError, Result};
use crate::rules::Rule;

use super::provider::{AiGateway, FixRequest, LlmConfig, RecommendRequest};
use super::{http, postprocess, prompts};

/// Gemini API base URL.
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Gemini provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    config: LlmConfig,
}

impl GeminiProvider {
    /// Create a provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, LlmConfig::default())
    }

    /// Create a provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Result<Self> {
        Ok(Self {
            client: http::client(&config)?,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from the `GEMINI_API_KEY` environment variable.
    pub fn from_env(config: LlmConfig) -> Result<Self> {
        Self::with_config(http::key_from_env(API_KEY_VAR)?, config)
    }

    fn model(&self) -> &str {
        self.config.model_or(DEFAULT_MODEL)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        http::json_headers("x-goog-api-key", &self.api_key, &[])
    }

    /// Generate text for a prompt. `json_mode` asks the model for a bare
    /// JSON document.
    fn generate(&self, prompt: &str, json_mode: bool) -> Result<String> {
        let mut generation_config = json!({
            "temperature": self.config.temperature,
            "maxOutputTokens": self.config.max_tokens,
        });
        if json_mode {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });

        let url = format!("{}/{}:generateContent", API_BASE, self.model());
        let api_response: ApiResponse = http::post_json(&self.client, &url, self.build_headers()?, &body)?;
        api_response.text()
    }
}

impl AiGateway for GeminiProvider {
    fn suggest_fix(&self, request: &FixRequest) -> Result<String> {
        let prompt = prompts::fix_prompt(request)?;
        let response = self.generate(&prompt, false)?;
        Ok(postprocess::clean_suggestion(&response))
    }

    fn recommend_rules(&self, request: &RecommendRequest) -> Result<Vec<Rule>> {
        let prompt = prompts::recommend_prompt(request)?;
        let response = self.generate(&prompt, false)?;
        Ok(postprocess::parse_recommendations(&response))
    }

    fn nl_to_rule(&self, text: &str) -> Result<Rule> {
        let response = self.generate(&prompts::nl_rule_prompt(text), true)?;
        postprocess::extract_json_object(&response).map(Rule::from_value)
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Gemini `generateContent` response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl ApiResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Result<String> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| AlchemistError::Llm("No candidates in API response".to_string()))?;

        Ok(content.parts.into_iter().map(|p| p.text).collect())
    }
}
