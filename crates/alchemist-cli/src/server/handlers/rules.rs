//! Rule and weight handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use alchemist::{Mutation, Rule, RuleDraft, RulesExport, WeightPreset, Weights};

use crate::server::error::ApiError;
use crate::server::state::ServerState;

/// GET /api/rules
pub async fn get_rules(State(state): State<ServerState>) -> Json<Vec<Rule>> {
    let session = state.session.read().await;
    Json(session.rules().as_slice().to_vec())
}

/// Body for adding a rule: form text for a template, or a rule object
/// (for example one returned by the AI endpoints) stored as given.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum AddRuleRequest {
    Draft { draft: RuleDraft },
    Rule { rule: Value },
}

/// POST /api/rules
pub async fn add_rule(
    State(state): State<ServerState>,
    Json(req): Json<AddRuleRequest>,
) -> Result<Json<Vec<Rule>>, ApiError> {
    let rule = match req {
        AddRuleRequest::Draft { draft } => draft.build()?,
        AddRuleRequest::Rule { rule } => Rule::from_value(rule),
    };

    let mut session = state.session.write().await;
    session.dispatch(Mutation::AddRule(rule))?;
    Ok(Json(session.rules().as_slice().to_vec()))
}

/// GET /api/rules/export - the rules.json document.
pub async fn export_rules(State(state): State<ServerState>) -> Json<RulesExport> {
    let session = state.session.read().await;
    Json(session.rules_export())
}

/// GET /api/weights
pub async fn get_weights(State(state): State<ServerState>) -> Json<Weights> {
    let session = state.session.read().await;
    Json(*session.weights())
}

/// PUT /api/weights - replace all four weights.
pub async fn put_weights(
    State(state): State<ServerState>,
    Json(weights): Json<Weights>,
) -> Result<Json<Weights>, ApiError> {
    let mut session = state.session.write().await;
    session.dispatch(Mutation::SetWeights(weights))?;
    Ok(Json(*session.weights()))
}

/// Body for changing one weight.
#[derive(Deserialize)]
pub struct SetWeightRequest {
    pub value: i64,
}

/// PUT /api/weights/:name
pub async fn set_weight(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Json(req): Json<SetWeightRequest>,
) -> Result<Json<Weights>, ApiError> {
    let mut session = state.session.write().await;
    session.dispatch(Mutation::SetWeight {
        name,
        value: req.value,
    })?;
    Ok(Json(*session.weights()))
}

/// POST /api/weights/preset/:preset
pub async fn apply_preset(
    State(state): State<ServerState>,
    Path(preset): Path<String>,
) -> Result<Json<Weights>, ApiError> {
    let preset: WeightPreset = preset
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Unknown preset: {}", preset)))?;

    let mut session = state.session.write().await;
    session.dispatch(Mutation::ApplyPreset(preset))?;
    Ok(Json(*session.weights()))
}
