//! Entity schemas, typed records and the dataset snapshot.

mod dataset;
mod entity;
mod record;

pub use dataset::Dataset;
pub use entity::{CLIENT_SCHEMA, EntityKind, TASK_SCHEMA, WORKER_SCHEMA};
pub use record::{ClientRecord, EntityRecord, EntityTable, Record, TaskRecord, WorkerRecord};
