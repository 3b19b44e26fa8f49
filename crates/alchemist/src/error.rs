//! Error types for the Alchemist library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Alchemist operations.
#[derive(Debug, Error)]
pub enum AlchemistError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file, header-only file, or no columns.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entity name not one of clients, workers, tasks.
    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    /// Field is not part of the entity's canonical schema.
    #[error("Unknown field '{field}' for {entity}")]
    UnknownField { entity: String, field: String },

    /// Row index past the end of the table.
    #[error("Row {row} out of range for {entity} ({len} rows)")]
    RowOutOfRange {
        entity: String,
        row: usize,
        len: usize,
    },

    /// Weight outside the accepted 1-10 range, or unknown weight name.
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    /// Manual rule input could not be turned into a rule.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// AI provider request or response failure.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Error exporting or loading files.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A fix token no longer matches the cell it was issued for.
    #[error("Stale fix for {entity} row {row}, column {column}")]
    StaleFix {
        entity: String,
        row: usize,
        column: String,
    },
}

/// Result type alias for Alchemist operations.
pub type Result<T> = std::result::Result<T, AlchemistError>;
