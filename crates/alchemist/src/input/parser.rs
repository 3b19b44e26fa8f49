//! CSV parser producing raw tables.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::source::{RawTable, SourceMetadata};
use crate::error::{AlchemistError, Result};

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            max_rows: None,
        }
    }
}

/// Parses CSV files with a header row.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the raw table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(RawTable, SourceMetadata)> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| AlchemistError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (table, mut metadata) = self.parse_bytes(file, &contents)?;
        metadata.path = Some(path.to_path_buf());
        Ok((table, metadata))
    }

    /// Parse in-memory CSV content, e.g. an uploaded file body.
    pub fn parse_bytes(
        &self,
        name: impl Into<String>,
        bytes: &[u8],
    ) -> Result<(RawTable, SourceMetadata)> {
        let table = self.read_table(bytes)?;

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let metadata = SourceMetadata::new(
            name,
            None,
            hash,
            bytes.len() as u64,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    fn read_table(&self, bytes: &[u8]) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AlchemistError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            if let Some(max) = self.config.max_rows {
                if rows.len() >= max {
                    break;
                }
            }

            // Empty lines never reach here; a row of empty fields (`,,`) is kept.
            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            row.truncate(expected_cols);
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(AlchemistError::EmptyData("No data rows found".to_string()));
        }

        Ok(RawTable::new(headers, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let (table, meta) = parser
            .parse_bytes("tasks.csv", b"TaskID,TaskName,Duration\nT1,Build,2\nT2,Test,1")
            .unwrap();

        assert_eq!(table.headers, vec!["TaskID", "TaskName", "Duration"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 1), Some("Build"));
        assert_eq!(meta.file, "tasks.csv");
        assert_eq!(meta.row_count, 2);
        assert!(meta.hash.starts_with("sha256:"));
    }

    #[test]
    fn test_skips_blank_lines_and_keeps_short_rows() {
        let parser = Parser::new();
        let (table, _) = parser
            .parse_bytes("t", b"a,b,c\n1,2,3\n\n4,5\n")
            .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 1), Some("5"));
        assert_eq!(table.get(1, 2), None);
    }

    #[test]
    fn test_keeps_rows_of_empty_fields() {
        let parser = Parser::new();
        let (table, meta) = parser
            .parse_bytes("t", b"a,b,c\n1,2,3\n,,\n\n")
            .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(meta.row_count, 2);
        assert_eq!(table.rows[1], vec!["", "", ""]);
    }

    #[test]
    fn test_keeps_quoted_empty_single_field() {
        let parser = Parser::new();
        let (table, _) = parser.parse_bytes("t", b"a\n1\n\"\"\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 0), Some(""));
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let parser = Parser::new();
        let (table, _) = parser
            .parse_bytes("t", b"WorkerID,AvailableSlots\nW1,\"[1,2,3]\"\n")
            .unwrap();
        assert_eq!(table.get(0, 1), Some("[1,2,3]"));
    }

    #[test]
    fn test_header_only_is_empty_data() {
        let parser = Parser::new();
        let err = parser.parse_bytes("t", b"a,b,c\n").unwrap_err();
        assert!(matches!(err, AlchemistError::EmptyData(_)));
    }

    #[test]
    fn test_empty_input_is_error() {
        let parser = Parser::new();
        assert!(parser.parse_bytes("t", b"").is_err());
    }

    #[test]
    fn test_strips_bom() {
        let parser = Parser::new();
        let (table, _) = parser
            .parse_bytes("t", "\u{feff}ClientID,ClientName\nC1,Acme\n".as_bytes())
            .unwrap();
        assert_eq!(table.headers[0], "ClientID");
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..Default::default()
        });
        let (table, _) = parser.parse_bytes("t", b"a\n1\n2\n3\n").unwrap();
        assert_eq!(table.row_count(), 1);
    }
}
