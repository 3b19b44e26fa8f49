//! CSV import/export and header mapping.

mod export;
mod import;
mod mapping;
mod parser;
mod source;

pub use export::{to_csv_string, write_csv};
pub use import::{ImportedTable, import_bytes, import_file};
pub use mapping::{HeaderMapping, apply_mapping, map_headers};
pub use parser::{Parser, ParserConfig};
pub use source::{RawTable, SourceMetadata};
