//! Validation engine for the client, worker and task tables.

mod engine;
mod error;
mod parse;
mod validators;

pub use engine::{ValidationEngine, ValidationReport};
pub use error::{ErrorKind, Severity, ValidationError};
pub use parse::{parse_available_slots, parse_int_prefix, split_list};
pub use validators::{
    ClientValidator, TaskValidator, Validator, WorkerValidator, validate_clients, validate_tasks,
    validate_workers,
};
