//! Header mapping from uploaded column names onto a canonical schema.
//!
//! Matching is case-insensitive and exact (after trimming surrounding
//! whitespace). There is no fuzzy matching. When two raw headers resolve to
//! the same canonical column the leftmost one wins and the others are
//! recorded as collisions and dropped.

use indexmap::IndexMap;
use serde::Serialize;

use super::source::RawTable;
use crate::schema::{EntityKind, EntityTable};

/// Result of aligning raw headers with a canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderMapping {
    /// Raw header -> canonical column (None = no match), in raw order.
    entries: IndexMap<String, Option<&'static str>>,
    /// Raw headers dropped because an earlier header claimed the same column.
    collisions: Vec<String>,
}

impl HeaderMapping {
    /// Map `headers` onto `schema`.
    pub fn new(headers: &[String], schema: &'static [&'static str]) -> Self {
        let mut entries = IndexMap::new();
        let mut collisions = Vec::new();

        for header in headers {
            let needle = header.trim();
            let matched = schema
                .iter()
                .copied()
                .find(|column| column.eq_ignore_ascii_case(needle));

            let target = match matched {
                Some(column) if entries.values().any(|v| *v == Some(column)) => {
                    tracing::warn!(
                        header = %header,
                        column,
                        "header collides with an earlier column, dropping"
                    );
                    collisions.push(header.clone());
                    None
                }
                other => other,
            };

            // Duplicate raw headers keep their first entry.
            entries.entry(header.clone()).or_insert(target);
        }

        Self { entries, collisions }
    }

    /// Canonical column for a raw header.
    pub fn target(&self, header: &str) -> Option<&'static str> {
        self.entries.get(header).copied().flatten()
    }

    /// Raw headers with no canonical match.
    pub fn unmatched(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(raw, target)| target.is_none() && !self.collisions.contains(raw))
            .map(|(raw, _)| raw.as_str())
            .collect()
    }

    /// Raw headers dropped because of a collision.
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    /// Iterate `(raw header, canonical column)` pairs in raw order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&'static str>)> {
        self.entries.iter().map(|(raw, target)| (raw.as_str(), *target))
    }

    /// Canonical columns of `schema` that no raw header supplies.
    pub fn missing(&self, schema: &'static [&'static str]) -> Vec<&'static str> {
        schema
            .iter()
            .copied()
            .filter(|column| !self.entries.values().any(|v| *v == Some(*column)))
            .collect()
    }

    /// Per-position targets for a header row. Duplicate raw headers after the
    /// first position map to nothing.
    fn positional(&self, headers: &[String]) -> Vec<Option<&'static str>> {
        let mut seen = std::collections::HashSet::new();
        headers
            .iter()
            .map(|h| {
                if seen.insert(h.as_str()) {
                    self.target(h)
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Map headers with the free-function shape used by callers that only need
/// the raw -> canonical lookup.
pub fn map_headers(headers: &[String], schema: &'static [&'static str]) -> HeaderMapping {
    HeaderMapping::new(headers, schema)
}

/// Apply a mapping to a raw table, producing typed rows for `kind`.
///
/// Unmatched columns are dropped from every row; cells past the end of a
/// short row are left absent.
pub fn apply_mapping(kind: EntityKind, table: &RawTable, mapping: &HeaderMapping) -> EntityTable {
    let targets = mapping.positional(&table.headers);

    let rows = table.rows.iter().map(|row| {
        targets
            .iter()
            .enumerate()
            .filter_map(|(idx, target)| {
                let column = (*target)?;
                let value = row.get(idx)?;
                Some((column, value.clone()))
            })
            .collect::<Vec<_>>()
    });

    EntityTable::from_field_rows(kind, rows)
}
