//! Tokenized AI fix suggestions against the session.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use alchemist::llm::suggest_fix_or_none;
use alchemist::{EntityKind, FixStatus, FixToken, Mutation, PendingFix, ValidationError};

use crate::server::error::ApiError;
use crate::server::state::ServerState;

/// Request body for a fix suggestion.
#[derive(Deserialize)]
pub struct FixCellRequest {
    pub entity: EntityKind,
    pub row: usize,
    pub col: String,
}

/// Outcome of a fix request.
#[derive(Serialize)]
pub struct FixResponse {
    pub token: FixToken,
    pub status: FixStatus,
    pub suggestion: Option<String>,
}

/// POST /api/fixes - ask the gateway for one cell and record the answer
/// if the cell is unchanged by the time it arrives.
pub async fn request_fix(
    State(state): State<ServerState>,
    Json(req): Json<FixCellRequest>,
) -> Result<Json<FixResponse>, ApiError> {
    let (token, request) = {
        let mut session = state.session.write().await;
        session.begin_fix(req.entity, req.row, &req.col)?
    };

    let suggestion = if state.gateway.is_some() {
        state
            .call_gateway(move |gateway| suggest_fix_or_none(gateway, &request))
            .await?
    } else {
        None
    };

    let status = {
        let mut session = state.session.write().await;
        session.complete_fix(token.clone(), suggestion.clone())
    };

    Ok(Json(FixResponse {
        token,
        status,
        suggestion: suggestion.filter(|_| status == FixStatus::Recorded),
    }))
}

/// GET /api/fixes - suggestions that can still be applied.
pub async fn get_pending_fixes(State(state): State<ServerState>) -> Json<Vec<PendingFix>> {
    let session = state.session.read().await;
    Json(session.pending_fixes())
}

/// Request body for applying a recorded suggestion.
#[derive(Deserialize)]
pub struct ApplyFixRequest {
    pub token: FixToken,
}

/// Errors left in the table the fix was applied to.
#[derive(Serialize)]
pub struct ApplyFixResponse {
    pub entity: EntityKind,
    pub errors: Vec<ValidationError>,
}

/// POST /api/fixes/apply
pub async fn apply_fix(
    State(state): State<ServerState>,
    Json(req): Json<ApplyFixRequest>,
) -> Result<Json<ApplyFixResponse>, ApiError> {
    let entity = req.token.entity;
    let mut session = state.session.write().await;
    session.dispatch(Mutation::ApplyFix { token: req.token })?;
    Ok(Json(ApplyFixResponse {
        entity,
        errors: session.report().for_entity(entity).to_vec(),
    }))
}
