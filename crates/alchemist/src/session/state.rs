//! The single-writer application state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::fixes::{FixStatus, FixToken, FixTracker, PendingFix};
use super::mutation::Mutation;
use crate::error::{AlchemistError, Result};
use crate::input::{HeaderMapping, ImportedTable, Parser, SourceMetadata, import_bytes, import_file, write_csv};
use crate::llm::FixRequest;
use crate::query::Query;
use crate::rules::{RULES_FILE_NAME, RuleStore, RulesExport, Weights};
use crate::schema::{Dataset, EntityKind, EntityRecord, Record};
use crate::validation::{ValidationEngine, ValidationReport};

/// What an import produced, for display.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub entity: EntityKind,
    pub rows: usize,
    pub mapping: HeaderMapping,
    pub source: SourceMetadata,
}

/// A row matched by a search, with its index in the table.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub row: usize,
    pub record: Record,
}

/// Tables, rules, weights and the derived validation report.
///
/// All changes go through [`AppState::dispatch`], which always recomputes
/// the report from scratch. A failed mutation leaves the state untouched.
pub struct AppState {
    dataset: Dataset,
    rules: RuleStore,
    weights: Weights,
    report: ValidationReport,
    sources: BTreeMap<EntityKind, SourceMetadata>,
    fixes: FixTracker,
    engine: ValidationEngine,
}

impl AppState {
    /// Start from a dataset, validating it immediately.
    pub fn new(dataset: Dataset) -> Self {
        let engine = ValidationEngine::new();
        let report = engine.validate(&dataset);
        Self {
            dataset,
            rules: RuleStore::new(),
            weights: Weights::default(),
            report,
            sources: BTreeMap::new(),
            fixes: FixTracker::new(),
            engine,
        }
    }

    /// Start from the bundled sample tables.
    pub fn with_samples() -> Result<Self> {
        Ok(Self::new(Dataset::bundled()?))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Where each table was last imported from.
    pub fn sources(&self) -> &BTreeMap<EntityKind, SourceMetadata> {
        &self.sources
    }

    /// Apply one mutation and revalidate.
    pub fn dispatch(&mut self, mutation: Mutation) -> Result<()> {
        let name = mutation.name();
        match mutation {
            Mutation::ReplaceTable { table, source } => {
                let entity = table.kind();
                self.dataset.replace(table);
                match source {
                    Some(source) => {
                        self.sources.insert(entity, source);
                    }
                    None => {
                        self.sources.remove(&entity);
                    }
                }
                self.fixes.table_replaced(entity);
            }
            Mutation::EditCell {
                entity,
                row,
                column,
                value,
            } => {
                self.dataset.set_cell(entity, row, &column, value)?;
                self.fixes.cell_changed(entity, row, &column);
            }
            Mutation::ApplyFix { token } => {
                let suggestion = self.fixes.take(&token)?;
                self.dataset
                    .set_cell(token.entity, token.row, &token.column, suggestion)?;
                self.fixes.cell_changed(token.entity, token.row, &token.column);
            }
            Mutation::AddRule(rule) => self.rules.add(rule),
            Mutation::SetWeights(weights) => {
                weights.validate()?;
                self.weights = weights;
            }
            Mutation::SetWeight { name, value } => self.weights.set(&name, value)?,
            Mutation::ApplyPreset(preset) => self.weights = preset.weights(),
        }

        self.revalidate();
        tracing::debug!(mutation = name, errors = self.report.total(), "state updated");
        Ok(())
    }

    fn revalidate(&mut self) {
        self.report = self.engine.validate(&self.dataset);
    }

    fn install(&mut self, entity: EntityKind, imported: ImportedTable) -> Result<ImportSummary> {
        let summary = ImportSummary {
            entity,
            rows: imported.table.len(),
            mapping: imported.mapping,
            source: imported.source.clone(),
        };
        self.dispatch(Mutation::ReplaceTable {
            table: imported.table,
            source: Some(imported.source),
        })?;
        Ok(summary)
    }

    /// Import CSV content into one table. On error the previous table and
    /// report stay in place.
    pub fn import_csv(
        &mut self,
        parser: &Parser,
        entity: EntityKind,
        name: &str,
        bytes: &[u8],
    ) -> Result<ImportSummary> {
        let imported = import_bytes(parser, entity, name, bytes)?;
        self.install(entity, imported)
    }

    /// Import a CSV file into one table.
    pub fn import_path(
        &mut self,
        parser: &Parser,
        entity: EntityKind,
        path: impl AsRef<Path>,
    ) -> Result<ImportSummary> {
        let imported = import_file(parser, entity, path)?;
        self.install(entity, imported)
    }

    /// Rows of one table matching a filter query.
    pub fn search(&self, entity: EntityKind, query: &str) -> Vec<SearchHit> {
        let Some(query) = Query::parse(query) else {
            return Vec::new();
        };

        fn hits<R: EntityRecord>(
            rows: &[R],
            query: &Query,
            wrap: fn(R) -> Record,
        ) -> Vec<SearchHit> {
            rows.iter()
                .enumerate()
                .filter(|(_, r)| query.matches(*r))
                .map(|(row, r)| SearchHit {
                    row,
                    record: wrap(r.clone()),
                })
                .collect()
        }

        match entity {
            EntityKind::Clients => hits(&self.dataset.clients, &query, Record::Client),
            EntityKind::Workers => hits(&self.dataset.workers, &query, Record::Worker),
            EntityKind::Tasks => hits(&self.dataset.tasks, &query, Record::Task),
        }
    }

    /// Start a fix request for one cell.
    ///
    /// The request carries the first validation message for the cell, or an
    /// empty message if the cell has none.
    pub fn begin_fix(
        &mut self,
        entity: EntityKind,
        row: usize,
        column: &str,
    ) -> Result<(FixToken, FixRequest)> {
        if !entity.has_field(column) {
            return Err(AlchemistError::UnknownField {
                entity: entity.to_string(),
                field: column.to_string(),
            });
        }
        let record = self
            .dataset
            .record(entity, row)
            .ok_or_else(|| AlchemistError::RowOutOfRange {
                entity: entity.to_string(),
                row,
                len: self.dataset.len(entity),
            })?;

        let message = self
            .report
            .errors_at(entity, row, column)
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_default();

        let request = FixRequest {
            row,
            col: column.to_string(),
            value: record.get(column).unwrap_or_default().to_string(),
            message,
            row_data: serde_json::to_value(&record)?,
            entity_type: entity,
        };

        Ok((self.fixes.issue(entity, row, column), request))
    }

    /// Record the gateway's answer for a fix request.
    pub fn complete_fix(&mut self, token: FixToken, suggestion: Option<String>) -> FixStatus {
        self.fixes.complete(token, suggestion)
    }

    /// Suggestions that can still be applied.
    pub fn pending_fixes(&self) -> Vec<PendingFix> {
        self.fixes.pending().cloned().collect()
    }

    /// The `rules.json` document for the current rules and weights.
    pub fn rules_export(&self) -> RulesExport {
        RulesExport::new(self.rules.iter().cloned(), self.weights)
    }

    /// Owned copy of what [`AppState::export_all`] writes, so the files can
    /// be written after any lock on the state is released.
    pub fn export_snapshot(&self) -> ExportSnapshot {
        ExportSnapshot {
            dataset: self.dataset.clone(),
            rules: self.rules_export(),
        }
    }

    /// Write the three cleaned CSVs and `rules.json` into `dir`.
    pub fn export_all(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        write_export(&self.dataset, &self.rules_export(), dir.as_ref())
    }
}

/// Tables and rules captured for a full export.
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    dataset: Dataset,
    rules: RulesExport,
}

impl ExportSnapshot {
    /// Write the three cleaned CSVs and `rules.json` into `dir`.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        write_export(&self.dataset, &self.rules, dir.as_ref())
    }
}

fn write_export(dataset: &Dataset, rules: &RulesExport, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for entity in EntityKind::ALL {
        let path = dir.join(entity.export_file_name());
        write_csv(&dataset.table(entity), &path)?;
        written.push(path);
    }

    let rules_path = dir.join(RULES_FILE_NAME);
    rules.save(&rules_path)?;
    written.push(rules_path);

    tracing::info!(dir = %dir.display(), files = written.len(), "exported session");
    Ok(written)
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Dataset::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{AiGateway, MockProvider, suggest_fix_or_none};
    use crate::rules::{KnownRule, Rule, WeightPreset};
    use tempfile::tempdir;

    fn duration_errors(state: &AppState, row: usize) -> usize {
        state.report().errors_at(EntityKind::Tasks, row, "Duration").len()
    }

    #[test]
    fn test_edit_revalidates() {
        let mut state = AppState::with_samples().unwrap();
        assert_eq!(duration_errors(&state, 3), 1);

        state
            .dispatch(Mutation::EditCell {
                entity: EntityKind::Tasks,
                row: 3,
                column: "Duration".into(),
                value: "2".into(),
            })
            .unwrap();
        assert_eq!(duration_errors(&state, 3), 0);
    }

    #[test]
    fn test_failed_mutation_leaves_state() {
        let mut state = AppState::with_samples().unwrap();
        let before = state.report().clone();

        let err = state.dispatch(Mutation::EditCell {
            entity: EntityKind::Tasks,
            row: 99,
            column: "Duration".into(),
            value: "2".into(),
        });
        assert!(matches!(err, Err(AlchemistError::RowOutOfRange { .. })));
        assert!(state.dispatch(Mutation::SetWeight { name: "fairness".into(), value: 42 }).is_err());

        assert_eq!(state.report(), &before);
        assert_eq!(state.weights(), &Weights::default());
    }

    #[test]
    fn test_failed_import_keeps_previous_table() {
        let mut state = AppState::with_samples().unwrap();
        let clients = state.dataset().clients.clone();
        let report = state.report().clone();

        let result = state.import_csv(&Parser::new(), EntityKind::Clients, "empty.csv", b"ClientID,ClientName\n");
        assert!(matches!(result, Err(AlchemistError::EmptyData(_))));
        assert_eq!(state.dataset().clients, clients);
        assert_eq!(state.report(), &report);
    }

    #[test]
    fn test_import_records_source() {
        let mut state = AppState::default();
        let summary = state
            .import_csv(&Parser::new(), EntityKind::Tasks, "tasks.csv", b"TaskID,TaskName,Duration\nT1,Build,0\n")
            .unwrap();
        assert_eq!(summary.rows, 1);
        assert!(summary.source.hash.starts_with("sha256:"));
        assert_eq!(state.sources()[&EntityKind::Tasks].file, "tasks.csv");
        assert_eq!(duration_errors(&state, 0), 1);
    }

    #[test]
    fn test_fix_flow() {
        let mut state = AppState::with_samples().unwrap();
        let gateway = MockProvider::new();

        let (token, request) = state.begin_fix(EntityKind::Tasks, 3, "Duration").unwrap();
        assert_eq!(request.value, "0");
        assert!(!request.message.is_empty());

        let suggestion = suggest_fix_or_none(&gateway, &request);
        assert_eq!(state.complete_fix(token.clone(), suggestion), FixStatus::Recorded);
        assert_eq!(state.pending_fixes().len(), 1);

        state.dispatch(Mutation::ApplyFix { token }).unwrap();
        assert_eq!(state.dataset().cell(EntityKind::Tasks, 3, "Duration"), Some("1"));
        assert_eq!(duration_errors(&state, 3), 0);
        assert!(state.pending_fixes().is_empty());
    }

    #[test]
    fn test_stale_fix_never_applied() {
        let mut state = AppState::with_samples().unwrap();
        let gateway = MockProvider::new();

        let (token, request) = state.begin_fix(EntityKind::Clients, 2, "PriorityLevel").unwrap();
        let suggestion = gateway.suggest_fix(&request).ok();
        state.complete_fix(token.clone(), suggestion);

        state
            .dispatch(Mutation::EditCell {
                entity: EntityKind::Clients,
                row: 2,
                column: "PriorityLevel".into(),
                value: "4".into(),
            })
            .unwrap();

        let err = state.dispatch(Mutation::ApplyFix { token });
        assert!(matches!(err, Err(AlchemistError::StaleFix { .. })));
        assert_eq!(state.dataset().cell(EntityKind::Clients, 2, "PriorityLevel"), Some("4"));
    }

    #[test]
    fn test_begin_fix_rejects_unknown_cells() {
        let mut state = AppState::with_samples().unwrap();
        assert!(state.begin_fix(EntityKind::Tasks, 0, "Owner").is_err());
        assert!(state.begin_fix(EntityKind::Tasks, 100, "Duration").is_err());
    }

    #[test]
    fn test_search() {
        let state = AppState::with_samples().unwrap();
        let hits = state.search(EntityKind::Tasks, "Duration >= 2");
        let rows: Vec<usize> = hits.iter().map(|h| h.row).collect();
        assert_eq!(rows, vec![0, 1, 4]);
        assert!(state.search(EntityKind::Tasks, "Duration >> 2").is_empty());
    }

    #[test]
    fn test_rules_and_weights() {
        let mut state = AppState::default();
        state
            .dispatch(Mutation::AddRule(Rule::Known(KnownRule::CoRun {
                tasks: vec!["T1".into(), "T2".into()],
            })))
            .unwrap();
        state.dispatch(Mutation::ApplyPreset(WeightPreset::MinimizeWorkload)).unwrap();
        state.dispatch(Mutation::SetWeight { name: "fairness".into(), value: 9 }).unwrap();

        let export = state.rules_export();
        assert_eq!(export.rules.len(), 1);
        assert_eq!(export.weights, Weights::new(2, 2, 9, 10).unwrap());
    }

    #[test]
    fn test_export_all() {
        let dir = tempdir().unwrap();
        let state = AppState::with_samples().unwrap();
        let written = state.export_all(dir.path()).unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["clients_cleaned.csv", "workers_cleaned.csv", "tasks_cleaned.csv", "rules.json"]
        );
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_export_snapshot_ignores_later_edits() {
        let dir = tempdir().unwrap();
        let mut state = AppState::with_samples().unwrap();
        let snapshot = state.export_snapshot();

        state
            .dispatch(Mutation::AddRule(Rule::Known(KnownRule::CoRun {
                tasks: vec!["T1".into(), "T2".into()],
            })))
            .unwrap();
        snapshot.write_to(dir.path()).unwrap();

        let rules = RulesExport::load(dir.path().join(RULES_FILE_NAME)).unwrap();
        assert!(rules.rules.is_empty());
        let tasks = std::fs::read_to_string(dir.path().join("tasks_cleaned.csv")).unwrap();
        assert_eq!(tasks.lines().count(), state.dataset().tasks.len() + 1);
    }
}
