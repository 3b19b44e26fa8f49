//! CSV export of entity tables.

use std::fs;
use std::path::Path;

use crate::error::{AlchemistError, Result};
use crate::schema::EntityTable;

/// Serialize a table to CSV text.
///
/// The header is the set of canonical columns present in any row, in schema
/// order. Absent cells are written blank.
pub fn to_csv_string(table: &EntityTable) -> Result<String> {
    let columns = table.present_columns();
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(&columns)?;
        for row in table.cell_rows(&columns) {
            writer.write_record(&row)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AlchemistError::Persistence(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AlchemistError::Persistence(format!("CSV output is not UTF-8: {}", e)))
}

/// Write a table to a CSV file, creating parent directories as needed.
pub fn write_csv(table: &EntityTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = to_csv_string(table)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| AlchemistError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(path, text).map_err(|e| AlchemistError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), rows = table.len(), "exported table");
    Ok(())
}
