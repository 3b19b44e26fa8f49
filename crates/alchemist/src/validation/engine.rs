//! Full-recompute validation over the three-table snapshot.

use serde::{Deserialize, Serialize};

use super::error::{Severity, ValidationError};
use super::validators::{ClientValidator, TaskValidator, Validator, WorkerValidator};
use crate::schema::{Dataset, EntityKind};

/// Errors for every table, computed from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub clients: Vec<ValidationError>,
    pub workers: Vec<ValidationError>,
    pub tasks: Vec<ValidationError>,
}

impl ValidationReport {
    /// Errors for one table.
    pub fn for_entity(&self, kind: EntityKind) -> &[ValidationError] {
        match kind {
            EntityKind::Clients => &self.clients,
            EntityKind::Workers => &self.workers,
            EntityKind::Tasks => &self.tasks,
        }
    }

    fn for_entity_mut(&mut self, kind: EntityKind) -> &mut Vec<ValidationError> {
        match kind {
            EntityKind::Clients => &mut self.clients,
            EntityKind::Workers => &mut self.workers,
            EntityKind::Tasks => &mut self.tasks,
        }
    }

    /// Total number of errors and warnings.
    pub fn total(&self) -> usize {
        self.clients.len() + self.workers.len() + self.tasks.len()
    }

    /// Number of error-severity entries.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning-severity entries.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Whether no table has any entry.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Errors pointing at one cell.
    pub fn errors_at(&self, kind: EntityKind, row: usize, column: &str) -> Vec<&ValidationError> {
        self.for_entity(kind)
            .iter()
            .filter(|e| e.is_at(row, column))
            .collect()
    }

    fn count(&self, severity: Severity) -> usize {
        EntityKind::ALL
            .iter()
            .flat_map(|kind| self.for_entity(*kind))
            .filter(|e| e.severity == severity)
            .count()
    }
}

/// Validation engine running every entity validator.
pub struct ValidationEngine {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationEngine {
    /// Create a new validation engine with the client, worker and task validators.
    pub fn new() -> Self {
        Self {
            validators: vec![
                Box::new(ClientValidator),
                Box::new(WorkerValidator),
                Box::new(TaskValidator),
            ],
        }
    }

    /// Run all validators over the snapshot.
    ///
    /// There is no incremental mode: every call recomputes every table.
    pub fn validate(&self, dataset: &Dataset) -> ValidationReport {
        let mut report = ValidationReport::default();

        for validator in &self.validators {
            let errors = validator.validate(dataset);
            report.for_entity_mut(validator.entity()).extend(errors);
        }

        tracing::debug!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "validated dataset"
        );

        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
