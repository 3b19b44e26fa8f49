//! CSV import: parse, map headers, build a typed table.

use std::path::Path;

use serde::Serialize;

use super::mapping::{HeaderMapping, apply_mapping};
use super::parser::Parser;
use super::source::{RawTable, SourceMetadata};
use crate::error::Result;
use crate::schema::{EntityKind, EntityTable};

/// A typed table together with how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedTable {
    /// The mapped rows.
    pub table: EntityTable,
    /// Header mapping applied to the raw columns.
    pub mapping: HeaderMapping,
    /// Where the data came from.
    pub source: SourceMetadata,
}

impl ImportedTable {
    fn from_raw(kind: EntityKind, raw: RawTable, source: SourceMetadata) -> Self {
        let mapping = HeaderMapping::new(&raw.headers, kind.schema());
        let table = apply_mapping(kind, &raw, &mapping);

        tracing::info!(
            entity = %kind,
            file = %source.file,
            rows = table.len(),
            unmatched = mapping.unmatched().len(),
            "imported table"
        );

        Self {
            table,
            mapping,
            source,
        }
    }
}

/// Import a CSV file as an entity table.
pub fn import_file(parser: &Parser, kind: EntityKind, path: impl AsRef<Path>) -> Result<ImportedTable> {
    let (raw, source) = parser.parse_file(path)?;
    Ok(ImportedTable::from_raw(kind, raw, source))
}

/// Import in-memory CSV content as an entity table.
pub fn import_bytes(
    parser: &Parser,
    kind: EntityKind,
    name: impl Into<String>,
    bytes: &[u8],
) -> Result<ImportedTable> {
    let (raw, source) = parser.parse_bytes(name, bytes)?;
    Ok(ImportedTable::from_raw(kind, raw, source))
}
