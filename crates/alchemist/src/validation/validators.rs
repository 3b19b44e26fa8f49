//! Per-entity validators.
//!
//! Each validator is a pure function of the current snapshot: it reads the
//! rows of its own table plus whatever sibling table it cross-references, and
//! returns errors in row order. Within a row, errors are emitted in check
//! order: required columns, duplicate id, numeric range, then format and
//! cross-reference checks.

use std::collections::HashSet;

use indexmap::IndexSet;

use super::error::{ErrorKind, ValidationError};
use super::parse::{parse_available_slots, parse_int_prefix, split_list};
use crate::schema::{ClientRecord, Dataset, EntityKind, EntityRecord, TaskRecord, WorkerRecord};

/// Trait for entity validators.
pub trait Validator: Send + Sync {
    /// The table this validator reports on.
    fn entity(&self) -> EntityKind;

    /// Run validation against the full snapshot.
    fn validate(&self, dataset: &Dataset) -> Vec<ValidationError>;
}

/// Validates the clients table against the current task ids.
pub struct ClientValidator;

impl Validator for ClientValidator {
    fn entity(&self) -> EntityKind {
        EntityKind::Clients
    }

    fn validate(&self, dataset: &Dataset) -> Vec<ValidationError> {
        self.check(&dataset.clients, &dataset.tasks)
    }
}

impl ClientValidator {
    /// Validate client rows, resolving `RequestedTaskIDs` against `tasks`.
    pub fn check(&self, clients: &[ClientRecord], tasks: &[TaskRecord]) -> Vec<ValidationError> {
        let task_ids: HashSet<&str> = tasks.iter().filter_map(|t| t.get("TaskID")).collect();

        let mut errors = Vec::new();
        let mut seen_ids = HashSet::new();

        for (idx, row) in clients.iter().enumerate() {
            check_required(row, idx, &mut errors);
            check_duplicate(row, idx, &mut seen_ids, &mut errors);

            if let Some(priority) = present(row, "PriorityLevel") {
                let in_range = parse_int_prefix(priority).is_some_and(|p| (1..=5).contains(&p));
                if !in_range {
                    errors.push(ValidationError::new(
                        idx,
                        "PriorityLevel",
                        ErrorKind::OutOfRange,
                        "PriorityLevel must be between 1 and 5.",
                    ));
                }
            }

            if let Some(attributes) = non_empty(row, "AttributesJSON") {
                if serde_json::from_str::<serde_json::Value>(attributes).is_err() {
                    errors.push(ValidationError::new(
                        idx,
                        "AttributesJSON",
                        ErrorKind::MalformedJson,
                        "Broken JSON in AttributesJSON.",
                    ));
                }
            }

            if let Some(requested) = row.get("RequestedTaskIDs") {
                let unknown: IndexSet<&str> = split_list(requested)
                    .filter(|id| !task_ids.contains(id))
                    .collect();
                for id in unknown {
                    errors.push(ValidationError::new(
                        idx,
                        "RequestedTaskIDs",
                        ErrorKind::UnknownReference,
                        format!("Unknown TaskID: {}", id),
                    ));
                }
            }
        }

        errors
    }
}

/// Validates the workers table.
pub struct WorkerValidator;

impl Validator for WorkerValidator {
    fn entity(&self) -> EntityKind {
        EntityKind::Workers
    }

    fn validate(&self, dataset: &Dataset) -> Vec<ValidationError> {
        self.check(&dataset.workers)
    }
}

impl WorkerValidator {
    /// Validate worker rows.
    pub fn check(&self, workers: &[WorkerRecord]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen_ids = HashSet::new();

        for (idx, row) in workers.iter().enumerate() {
            check_required(row, idx, &mut errors);
            check_duplicate(row, idx, &mut seen_ids, &mut errors);

            let max_load = present(row, "MaxLoadPerPhase").map(parse_int_prefix);
            if let Some(parsed) = max_load {
                if !parsed.is_some_and(|m| m >= 1) {
                    errors.push(ValidationError::new(
                        idx,
                        "MaxLoadPerPhase",
                        ErrorKind::OutOfRange,
                        "MaxLoadPerPhase must be >= 1.",
                    ));
                }
            }

            if let Some(slots_text) = non_empty(row, "AvailableSlots") {
                match parse_available_slots(slots_text) {
                    None => errors.push(ValidationError::new(
                        idx,
                        "AvailableSlots",
                        ErrorKind::MalformedSlots,
                        "Malformed AvailableSlots (must be numbers).",
                    )),
                    Some(slots) => {
                        let overloaded = max_load
                            .flatten()
                            .is_some_and(|max| (slots.len() as i64) < max);
                        if overloaded {
                            errors.push(ValidationError::new(
                                idx,
                                "AvailableSlots",
                                ErrorKind::Overloaded,
                                "Worker overloaded: AvailableSlots.length < MaxLoadPerPhase.",
                            ));
                        }
                    }
                }
            }
        }

        errors
    }
}

/// Validates the tasks table against the union of worker skills.
pub struct TaskValidator;

impl Validator for TaskValidator {
    fn entity(&self) -> EntityKind {
        EntityKind::Tasks
    }

    fn validate(&self, dataset: &Dataset) -> Vec<ValidationError> {
        self.check(&dataset.tasks, &dataset.workers)
    }
}

impl TaskValidator {
    /// Validate task rows, checking `RequiredSkills` coverage by `workers`.
    pub fn check(&self, tasks: &[TaskRecord], workers: &[WorkerRecord]) -> Vec<ValidationError> {
        let all_skills: HashSet<&str> = workers
            .iter()
            .filter_map(|w| w.get("Skills"))
            .flat_map(split_list)
            .collect();

        let mut errors = Vec::new();
        let mut seen_ids = HashSet::new();

        for (idx, row) in tasks.iter().enumerate() {
            check_required(row, idx, &mut errors);
            check_duplicate(row, idx, &mut seen_ids, &mut errors);

            if let Some(duration) = present(row, "Duration") {
                if !parse_int_prefix(duration).is_some_and(|d| d >= 1) {
                    errors.push(ValidationError::new(
                        idx,
                        "Duration",
                        ErrorKind::OutOfRange,
                        "Duration must be >= 1.",
                    ));
                }
            }

            if let Some(required) = row.get("RequiredSkills") {
                let uncovered: IndexSet<&str> = split_list(required)
                    .filter(|skill| !all_skills.contains(skill))
                    .collect();
                for skill in uncovered {
                    errors.push(ValidationError::new(
                        idx,
                        "RequiredSkills",
                        ErrorKind::UncoveredSkill,
                        format!("No worker covers required skill: {}", skill),
                    ));
                }
            }
        }

        errors
    }
}

/// Validate clients against the given tasks.
pub fn validate_clients(clients: &[ClientRecord], tasks: &[TaskRecord]) -> Vec<ValidationError> {
    ClientValidator.check(clients, tasks)
}

/// Validate workers.
pub fn validate_workers(workers: &[WorkerRecord]) -> Vec<ValidationError> {
    WorkerValidator.check(workers)
}

/// Validate tasks against the given workers.
pub fn validate_tasks(tasks: &[TaskRecord], workers: &[WorkerRecord]) -> Vec<ValidationError> {
    TaskValidator.check(tasks, workers)
}

/// Value of a column if present and non-blank.
fn present<'a, R: EntityRecord>(row: &'a R, column: &str) -> Option<&'a str> {
    row.get(column).filter(|v| !v.trim().is_empty())
}

/// Value of a column if present and not the empty string. Whitespace counts.
fn non_empty<'a, R: EntityRecord>(row: &'a R, column: &str) -> Option<&'a str> {
    row.get(column).filter(|v| !v.is_empty())
}

fn check_required<R: EntityRecord>(row: &R, idx: usize, errors: &mut Vec<ValidationError>) {
    for column in R::KIND.required_fields() {
        if row.is_blank(column) {
            errors.push(ValidationError::new(
                idx,
                *column,
                ErrorKind::MissingRequired,
                format!("Missing required column {}.", column),
            ));
        }
    }
}

/// First occurrence of an id wins; later rows with the same id are flagged.
/// Blank ids are left to the required-column check.
fn check_duplicate<'a, R: EntityRecord>(
    row: &'a R,
    idx: usize,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let column = R::KIND.id_field();
    if let Some(id) = present(row, column) {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                idx,
                column,
                ErrorKind::Duplicate,
                format!("Duplicate {}.", column),
            ));
        }
    }
}
