//! Entity kinds and their canonical column schemas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AlchemistError;

/// Canonical client columns, in export order.
pub const CLIENT_SCHEMA: &[&str] = &[
    "ClientID",
    "ClientName",
    "PriorityLevel",
    "RequestedTaskIDs",
    "GroupTag",
    "AttributesJSON",
];

/// Canonical worker columns, in export order.
pub const WORKER_SCHEMA: &[&str] = &[
    "WorkerID",
    "WorkerName",
    "Skills",
    "AvailableSlots",
    "MaxLoadPerPhase",
    "WorkerGroup",
    "QualificationLevel",
];

/// Canonical task columns, in export order.
pub const TASK_SCHEMA: &[&str] = &[
    "TaskID",
    "TaskName",
    "Category",
    "Duration",
    "RequiredSkills",
    "PreferredPhases",
    "MaxConcurrent",
];

/// One of the three related entity tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Clients,
    Workers,
    Tasks,
}

impl EntityKind {
    /// All entity kinds in validation order.
    pub const ALL: [EntityKind; 3] = [EntityKind::Clients, EntityKind::Workers, EntityKind::Tasks];

    /// Canonical ordered field list.
    pub fn schema(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Clients => CLIENT_SCHEMA,
            EntityKind::Workers => WORKER_SCHEMA,
            EntityKind::Tasks => TASK_SCHEMA,
        }
    }

    /// Fields that must be present and non-blank on every row.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Clients => &["ClientID", "ClientName", "PriorityLevel"],
            EntityKind::Workers => &["WorkerID", "WorkerName", "MaxLoadPerPhase"],
            EntityKind::Tasks => &["TaskID", "TaskName", "Duration"],
        }
    }

    /// The identifier column, unique within the table.
    pub fn id_field(&self) -> &'static str {
        match self {
            EntityKind::Clients => "ClientID",
            EntityKind::Workers => "WorkerID",
            EntityKind::Tasks => "TaskID",
        }
    }

    /// Lowercase plural name, also used as the AI gateway `entityType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Clients => "clients",
            EntityKind::Workers => "workers",
            EntityKind::Tasks => "tasks",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Clients => "Clients",
            EntityKind::Workers => "Workers",
            EntityKind::Tasks => "Tasks",
        }
    }

    /// Default file name for a cleaned export.
    pub fn export_file_name(&self) -> String {
        format!("{}_cleaned.csv", self.as_str())
    }

    /// File name of the bundled sample.
    pub fn sample_file_name(&self) -> String {
        format!("{}.csv", self.as_str())
    }

    /// Whether `field` is a canonical column of this entity.
    pub fn has_field(&self, field: &str) -> bool {
        self.schema().contains(&field)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AlchemistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clients" | "client" => Ok(EntityKind::Clients),
            "workers" | "worker" => Ok(EntityKind::Workers),
            "tasks" | "task" => Ok(EntityKind::Tasks),
            other => Err(AlchemistError::UnknownEntity(other.to_string())),
        }
    }
}
