//! The three-table dataset snapshot.

use serde::{Deserialize, Serialize};

use super::entity::EntityKind;
use super::record::{ClientRecord, EntityRecord, EntityTable, Record, TaskRecord, WorkerRecord};
use crate::error::{AlchemistError, Result};
use crate::input::{Parser, import_bytes};

const SAMPLE_CLIENTS: &str = include_str!("../../samples/clients.csv");
const SAMPLE_WORKERS: &str = include_str!("../../samples/workers.csv");
const SAMPLE_TASKS: &str = include_str!("../../samples/tasks.csv");

/// Current contents of all three entity tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub clients: Vec<ClientRecord>,
    pub workers: Vec<WorkerRecord>,
    pub tasks: Vec<TaskRecord>,
}

impl Dataset {
    /// An empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample tables shipped with the library.
    pub fn bundled() -> Result<Self> {
        let parser = Parser::new();
        let mut dataset = Self::new();
        for (kind, text) in [
            (EntityKind::Clients, SAMPLE_CLIENTS),
            (EntityKind::Workers, SAMPLE_WORKERS),
            (EntityKind::Tasks, SAMPLE_TASKS),
        ] {
            let imported = import_bytes(&parser, kind, kind.sample_file_name(), text.as_bytes())?;
            dataset.replace(imported.table);
        }
        Ok(dataset)
    }

    /// Replace one table wholesale.
    pub fn replace(&mut self, table: EntityTable) {
        match table {
            EntityTable::Clients(rows) => self.clients = rows,
            EntityTable::Workers(rows) => self.workers = rows,
            EntityTable::Tasks(rows) => self.tasks = rows,
        }
    }

    /// A copy of one table.
    pub fn table(&self, kind: EntityKind) -> EntityTable {
        match kind {
            EntityKind::Clients => EntityTable::Clients(self.clients.clone()),
            EntityKind::Workers => EntityTable::Workers(self.workers.clone()),
            EntityKind::Tasks => EntityTable::Tasks(self.tasks.clone()),
        }
    }

    /// Number of rows in one table.
    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Clients => self.clients.len(),
            EntityKind::Workers => self.workers.len(),
            EntityKind::Tasks => self.tasks.len(),
        }
    }

    /// Whether all three tables are empty.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.workers.is_empty() && self.tasks.is_empty()
    }

    /// A copy of one row.
    pub fn record(&self, kind: EntityKind, row: usize) -> Option<Record> {
        match kind {
            EntityKind::Clients => self.clients.get(row).cloned().map(Record::Client),
            EntityKind::Workers => self.workers.get(row).cloned().map(Record::Worker),
            EntityKind::Tasks => self.tasks.get(row).cloned().map(Record::Task),
        }
    }

    /// Raw value of one cell.
    pub fn cell(&self, kind: EntityKind, row: usize, column: &str) -> Option<&str> {
        match kind {
            EntityKind::Clients => self.clients.get(row).and_then(|r| r.get(column)),
            EntityKind::Workers => self.workers.get(row).and_then(|r| r.get(column)),
            EntityKind::Tasks => self.tasks.get(row).and_then(|r| r.get(column)),
        }
    }

    /// Overwrite one cell in place.
    pub fn set_cell(
        &mut self,
        kind: EntityKind,
        row: usize,
        column: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        match kind {
            EntityKind::Clients => set_cell(&mut self.clients, row, column, value),
            EntityKind::Workers => set_cell(&mut self.workers, row, column, value),
            EntityKind::Tasks => set_cell(&mut self.tasks, row, column, value),
        }
    }
}

fn set_cell<R: EntityRecord>(
    rows: &mut [R],
    row: usize,
    column: &str,
    value: impl Into<String>,
) -> Result<()> {
    let len = rows.len();
    let record = rows.get_mut(row).ok_or_else(|| AlchemistError::RowOutOfRange {
        entity: R::KIND.to_string(),
        row,
        len,
    })?;
    record.set(column, value)
}
