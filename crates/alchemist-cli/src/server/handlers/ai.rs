//! Stateless AI endpoints.
//!
//! These pass gateway failures through as `500 {"error": ...}`; callers treat
//! them as "no suggestion", "no recommendations" or "could not parse".

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use alchemist::{FixRequest, RecommendRequest, Rule};

use crate::server::error::ApiError;
use crate::server::state::ServerState;

#[derive(Serialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

/// POST /api/ai-error-correction
pub async fn ai_error_correction(
    State(state): State<ServerState>,
    Json(req): Json<FixRequest>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let suggestion = state
        .call_gateway(move |gateway| gateway.suggest_fix(&req))
        .await?
        .map_err(|e| ApiError::Gateway(e.to_string()))?;
    Ok(Json(SuggestionResponse { suggestion }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub ai_rules: Vec<Rule>,
}

/// POST /api/ai-rule-recommendations
pub async fn ai_rule_recommendations(
    State(state): State<ServerState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let ai_rules = state
        .call_gateway(move |gateway| gateway.recommend_rules(&req))
        .await?
        .map_err(|e| ApiError::Gateway(e.to_string()))?;
    Ok(Json(RecommendationsResponse { ai_rules }))
}

#[derive(Deserialize)]
pub struct NlRuleRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct NlRuleResponse {
    pub rule: Rule,
}

/// POST /api/nl-to-rule
pub async fn nl_to_rule(
    State(state): State<ServerState>,
    Json(req): Json<NlRuleRequest>,
) -> Result<Json<NlRuleResponse>, ApiError> {
    let rule = state
        .call_gateway(move |gateway| gateway.nl_to_rule(&req.text))
        .await?
        .map_err(|e| ApiError::Gateway(e.to_string()))?;
    Ok(Json(NlRuleResponse { rule }))
}
