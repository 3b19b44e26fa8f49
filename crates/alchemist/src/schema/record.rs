//! Typed records for the three entity tables.
//!
//! Every canonical column is an `Option<String>`: `None` means the column was
//! absent from the import, `Some` holds the raw cell text (possibly blank).
//! Validation works on the raw text so malformed values can be reported
//! rather than rejected at load time.

use serde::{Deserialize, Serialize};

use crate::error::{AlchemistError, Result};

use super::entity::EntityKind;

/// Common access to a record's canonical columns by name.
pub trait EntityRecord: Clone + Default + std::fmt::Debug + Serialize + Send + Sync {
    /// Which table this record belongs to.
    const KIND: EntityKind;

    /// Storage slot for a canonical column, `None` if the column is unknown.
    fn slot(&self, column: &str) -> Option<&Option<String>>;

    /// Mutable storage slot for a canonical column.
    fn slot_mut(&mut self, column: &str) -> Option<&mut Option<String>>;

    /// Raw value of a column, `None` if absent or unknown.
    fn get(&self, column: &str) -> Option<&str> {
        self.slot(column).and_then(|v| v.as_deref())
    }

    /// Whether a column is absent or blank after trimming.
    fn is_blank(&self, column: &str) -> bool {
        self.get(column).is_none_or(|v| v.trim().is_empty())
    }

    /// Set a column value in place.
    fn set(&mut self, column: &str, value: impl Into<String>) -> Result<()> {
        match self.slot_mut(column) {
            Some(slot) => {
                *slot = Some(value.into());
                Ok(())
            }
            None => Err(AlchemistError::UnknownField {
                entity: Self::KIND.to_string(),
                field: column.to_string(),
            }),
        }
    }

    /// Build a record from `(canonical column, value)` pairs.
    ///
    /// Pairs naming non-canonical columns are ignored. When a column appears
    /// more than once the first value is kept.
    fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut record = Self::default();
        for (column, value) in fields {
            if let Some(slot) = record.slot_mut(column) {
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
        }
        record
    }

    /// Canonical columns paired with their values, in schema order.
    fn values(&self) -> Vec<(&'static str, Option<&str>)> {
        Self::KIND
            .schema()
            .iter()
            .map(|column| (*column, self.get(column)))
            .collect()
    }
}

macro_rules! entity_record {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:expr, { $($field:ident => $column:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(
                #[serde(rename = $column, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )+
        }

        impl EntityRecord for $name {
            const KIND: EntityKind = $kind;

            fn slot(&self, column: &str) -> Option<&Option<String>> {
                match column {
                    $($column => Some(&self.$field),)+
                    _ => None,
                }
            }

            fn slot_mut(&mut self, column: &str) -> Option<&mut Option<String>> {
                match column {
                    $($column => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

entity_record! {
    /// A client requesting tasks.
    ClientRecord, EntityKind::Clients, {
        client_id => "ClientID",
        client_name => "ClientName",
        priority_level => "PriorityLevel",
        requested_task_ids => "RequestedTaskIDs",
        group_tag => "GroupTag",
        attributes_json => "AttributesJSON",
    }
}

entity_record! {
    /// A worker with skills and phase slots.
    WorkerRecord, EntityKind::Workers, {
        worker_id => "WorkerID",
        worker_name => "WorkerName",
        skills => "Skills",
        available_slots => "AvailableSlots",
        max_load_per_phase => "MaxLoadPerPhase",
        worker_group => "WorkerGroup",
        qualification_level => "QualificationLevel",
    }
}

entity_record! {
    /// A task to be scheduled.
    TaskRecord, EntityKind::Tasks, {
        task_id => "TaskID",
        task_name => "TaskName",
        category => "Category",
        duration => "Duration",
        required_skills => "RequiredSkills",
        preferred_phases => "PreferredPhases",
        max_concurrent => "MaxConcurrent",
    }
}

/// A single row of any entity table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Client(ClientRecord),
    Worker(WorkerRecord),
    Task(TaskRecord),
}

impl Record {
    /// Entity kind of this row.
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Client(_) => EntityKind::Clients,
            Record::Worker(_) => EntityKind::Workers,
            Record::Task(_) => EntityKind::Tasks,
        }
    }

    /// Raw value of a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        match self {
            Record::Client(r) => r.get(column),
            Record::Worker(r) => r.get(column),
            Record::Task(r) => r.get(column),
        }
    }
}

/// A whole entity table, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entity", content = "rows", rename_all = "lowercase")]
pub enum EntityTable {
    Clients(Vec<ClientRecord>),
    Workers(Vec<WorkerRecord>),
    Tasks(Vec<TaskRecord>),
}

impl EntityTable {
    /// An empty table of the given kind.
    pub fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Clients => EntityTable::Clients(Vec::new()),
            EntityKind::Workers => EntityTable::Workers(Vec::new()),
            EntityKind::Tasks => EntityTable::Tasks(Vec::new()),
        }
    }

    /// Build a table from rows of `(canonical column, value)` pairs.
    pub fn from_field_rows<'a, R, I>(kind: EntityKind, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (&'a str, String)>,
    {
        match kind {
            EntityKind::Clients => {
                EntityTable::Clients(rows.into_iter().map(ClientRecord::from_fields).collect())
            }
            EntityKind::Workers => {
                EntityTable::Workers(rows.into_iter().map(WorkerRecord::from_fields).collect())
            }
            EntityKind::Tasks => {
                EntityTable::Tasks(rows.into_iter().map(TaskRecord::from_fields).collect())
            }
        }
    }

    /// Entity kind of the table.
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityTable::Clients(_) => EntityKind::Clients,
            EntityTable::Workers(_) => EntityKind::Workers,
            EntityTable::Tasks(_) => EntityKind::Tasks,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            EntityTable::Clients(rows) => rows.len(),
            EntityTable::Workers(rows) => rows.len(),
            EntityTable::Tasks(rows) => rows.len(),
        }
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of one row.
    pub fn record(&self, row: usize) -> Option<Record> {
        match self {
            EntityTable::Clients(rows) => rows.get(row).cloned().map(Record::Client),
            EntityTable::Workers(rows) => rows.get(row).cloned().map(Record::Worker),
            EntityTable::Tasks(rows) => rows.get(row).cloned().map(Record::Task),
        }
    }

    /// Canonical columns present in at least one row, in schema order.
    pub fn present_columns(&self) -> Vec<&'static str> {
        match self {
            EntityTable::Clients(rows) => present_columns(rows),
            EntityTable::Workers(rows) => present_columns(rows),
            EntityTable::Tasks(rows) => present_columns(rows),
        }
    }

    /// Rows as ordered cell values for the given columns (absent cells blank).
    pub fn cell_rows(&self, columns: &[&str]) -> Vec<Vec<String>> {
        match self {
            EntityTable::Clients(rows) => cell_rows(rows, columns),
            EntityTable::Workers(rows) => cell_rows(rows, columns),
            EntityTable::Tasks(rows) => cell_rows(rows, columns),
        }
    }
}

fn present_columns<R: EntityRecord>(rows: &[R]) -> Vec<&'static str> {
    R::KIND
        .schema()
        .iter()
        .copied()
        .filter(|column| rows.iter().any(|row| row.get(column).is_some()))
        .collect()
}

fn cell_rows<R: EntityRecord>(rows: &[R], columns: &[&str]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.get(column).unwrap_or_default().to_string())
                .collect()
        })
        .collect()
}
