//! Table, validation, search and export handlers.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use alchemist::input::to_csv_string;
use alchemist::{
    Dataset, EntityKind, ImportSummary, Mutation, SearchHit, SourceMetadata, ValidationError,
    ValidationReport,
};

use super::parse_entity;
use crate::server::error::ApiError;
use crate::server::state::ServerState;

/// All three tables plus where they came from.
#[derive(Serialize)]
pub struct DataResponse {
    #[serde(flatten)]
    pub dataset: Dataset,
    pub sources: BTreeMap<EntityKind, SourceMetadata>,
}

/// The full validation report with counts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorsResponse {
    #[serde(flatten)]
    pub report: ValidationReport,
    pub error_count: usize,
    pub warning_count: usize,
}

impl ErrorsResponse {
    fn from_report(report: &ValidationReport) -> Self {
        Self {
            report: report.clone(),
            error_count: report.error_count(),
            warning_count: report.warning_count(),
        }
    }
}

/// GET /api/data
pub async fn get_data(State(state): State<ServerState>) -> Json<DataResponse> {
    let session = state.session.read().await;
    Json(DataResponse {
        dataset: session.dataset().clone(),
        sources: session.sources().clone(),
    })
}

/// GET /api/errors
pub async fn get_errors(State(state): State<ServerState>) -> Json<ErrorsResponse> {
    let session = state.session.read().await;
    Json(ErrorsResponse::from_report(session.report()))
}

/// Query string for uploads.
#[derive(Deserialize)]
pub struct UploadParams {
    /// File name to record in the source metadata.
    pub name: Option<String>,
}

/// Response after an upload.
#[derive(Serialize)]
pub struct UploadResponse {
    pub summary: ImportSummary,
    pub errors: Vec<ValidationError>,
}

/// POST /api/upload/:entity - CSV body replaces one table.
pub async fn upload_table(
    State(state): State<ServerState>,
    Path(entity): Path<String>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    let entity = parse_entity(&entity)?;
    let name = params
        .name
        .unwrap_or_else(|| entity.sample_file_name());

    let mut session = state.session.write().await;
    let summary = session.import_csv(&state.parser, entity, &name, &body)?;

    Ok(Json(UploadResponse {
        summary,
        errors: session.report().for_entity(entity).to_vec(),
    }))
}

/// Request body for a cell edit.
#[derive(Deserialize)]
pub struct EditRequest {
    pub entity: EntityKind,
    pub row: usize,
    pub col: String,
    pub value: String,
}

/// POST /api/edit
pub async fn edit_cell(
    State(state): State<ServerState>,
    Json(req): Json<EditRequest>,
) -> Result<Json<ErrorsResponse>, ApiError> {
    let mut session = state.session.write().await;
    session.dispatch(Mutation::EditCell {
        entity: req.entity,
        row: req.row,
        column: req.col,
        value: req.value,
    })?;
    Ok(Json(ErrorsResponse::from_report(session.report())))
}

/// Request body for a search.
#[derive(Deserialize)]
pub struct SearchRequest {
    pub entity: EntityKind,
    pub query: String,
}

/// Matching rows; `understood` is false when the query did not parse.
#[derive(Serialize)]
pub struct SearchResponse {
    pub understood: bool,
    pub hits: Vec<SearchHit>,
}

/// POST /api/search
pub async fn search(
    State(state): State<ServerState>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let session = state.session.read().await;
    Json(SearchResponse {
        understood: alchemist::Query::parse(&req.query).is_some(),
        hits: session.search(req.entity, &req.query),
    })
}

/// GET /api/export/:entity - the cleaned table as a CSV download.
pub async fn export_table(
    State(state): State<ServerState>,
    Path(entity): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let entity = parse_entity(&entity)?;
    let csv = {
        let session = state.session.read().await;
        to_csv_string(&session.dataset().table(entity))?
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", entity.export_file_name()),
            ),
        ],
        csv,
    ))
}

/// Files written by a full export.
#[derive(Serialize)]
pub struct ExportResponse {
    pub files: Vec<String>,
}

/// POST /api/export - write every cleaned CSV and rules.json to the export dir.
pub async fn export_all(State(state): State<ServerState>) -> Result<Json<ExportResponse>, ApiError> {
    let snapshot = state.session.read().await.export_snapshot();
    let dir = state.export_dir.clone();

    let written = tokio::task::spawn_blocking(move || snapshot.write_to(&dir))
        .await
        .map_err(|e| ApiError::Internal(format!("Export task failed: {}", e)))??;
    let files = written.into_iter().map(|p| p.display().to_string()).collect();
    Ok(Json(ExportResponse { files }))
}
