//! AI gateway trait and request types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::rules::Rule;
use crate::schema::{Dataset, EntityKind, Record};
use crate::validation::ValidationError;

/// Input for the suggest-fix contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixRequest {
    /// Row index of the flagged cell.
    pub row: usize,
    /// Column of the flagged cell.
    pub col: String,
    /// Current cell text (blank if absent).
    #[serde(default)]
    pub value: String,
    /// Validation message for the cell.
    pub message: String,
    /// The whole row, keyed by canonical column.
    #[serde(default)]
    pub row_data: Value,
    pub entity_type: EntityKind,
}

impl FixRequest {
    /// Build a request for one validation error on `record`.
    pub fn for_error(
        entity_type: EntityKind,
        record: &Record,
        error: &ValidationError,
    ) -> Result<Self> {
        Ok(Self {
            row: error.row,
            col: error.column.clone(),
            value: record.get(&error.column).unwrap_or_default().to_string(),
            message: error.message.clone(),
            row_data: serde_json::to_value(record)?,
            entity_type,
        })
    }
}

/// Input for the recommend-rules contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendRequest {
    pub data: Dataset,
    pub rules: Vec<Rule>,
}

impl RecommendRequest {
    pub fn new(data: Dataset, rules: Vec<Rule>) -> Self {
        Self { data, rules }
    }
}

/// Configuration shared by the HTTP-backed gateways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model name; `None` uses the provider's default.
    pub model: Option<String>,

    /// Maximum tokens in a response.
    pub max_tokens: usize,

    /// Sampling temperature (0.0-1.0).
    pub temperature: f64,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 1024,
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// The configured model, or `default` when unset.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.model.as_deref().unwrap_or(default)
    }
}

/// Trait for AI gateways.
///
/// Each call is independent and may fail; callers that must not be
/// interrupted use the best-effort wrappers in [`crate::llm`].
pub trait AiGateway: Send + Sync {
    /// Suggest a corrected value for one flagged cell.
    fn suggest_fix(&self, request: &FixRequest) -> Result<String>;

    /// Suggest up to three new rules for the current data and rules.
    fn recommend_rules(&self, request: &RecommendRequest) -> Result<Vec<Rule>>;

    /// Turn a plain-language instruction into a rule.
    fn nl_to_rule(&self, text: &str) -> Result<Rule>;

    /// Get the configuration for this gateway.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this gateway (for logging).
    fn name(&self) -> &str;
}
