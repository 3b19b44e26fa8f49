//! Raw imported tables and their source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about an imported CSV file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path (or a label for in-memory uploads).
    pub file: String,
    /// Full path, when imported from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header and blank lines).
    pub row_count: usize,
    /// Number of columns in the raw header.
    pub column_count: usize,
    /// When the import happened.
    pub imported_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for an import.
    pub fn new(
        file: impl Into<String>,
        path: Option<PathBuf>,
        hash: String,
        size_bytes: u64,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        Self {
            file: file.into(),
            path,
            hash,
            size_bytes,
            row_count,
            column_count,
            imported_at: Utc::now(),
        }
    }
}

/// A parsed CSV before header mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Header row exactly as read.
    pub headers: Vec<String>,
    /// Data rows. A row shorter than the header leaves trailing columns absent.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a raw table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell value by position, `None` past the end of a short row.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }
}
