//! Single-comparison row filter: `<field> <op> <integer>`.
//!
//! This is intentionally tiny. There are no string comparisons, ranges,
//! boolean operators or disjunctions. Anything that is not exactly one
//! comparison yields no rows rather than an error.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::EntityRecord;
use crate::validation::parse_int_prefix;

static QUERY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\s*(>=|<=|=|>|<)\s*(\d+)$").expect("valid query pattern"));

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Comparison {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Comparison::Greater),
            "<" => Some(Comparison::Less),
            "=" => Some(Comparison::Equal),
            ">=" => Some(Comparison::GreaterOrEqual),
            "<=" => Some(Comparison::LessOrEqual),
            _ => None,
        }
    }

    /// Operator symbol as written in a query.
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::Equal => "=",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
        }
    }

    fn holds(&self, left: i64, right: i64) -> bool {
        match self {
            Comparison::Greater => left > right,
            Comparison::Less => left < right,
            Comparison::Equal => left == right,
            Comparison::GreaterOrEqual => left >= right,
            Comparison::LessOrEqual => left <= right,
        }
    }
}

/// A parsed filter query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Column name, matched case-sensitively.
    pub field: String,
    pub op: Comparison,
    pub value: i64,
}

impl Query {
    /// Parse a query, `None` if it is not exactly one comparison.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = QUERY_PATTERN.captures(text.trim())?;
        let op = Comparison::from_symbol(&caps[2])?;
        let value = caps[3].parse::<i64>().ok()?;
        Some(Self {
            field: caps[1].to_string(),
            op,
            value,
        })
    }

    /// Whether a row satisfies the comparison. Rows whose cell has no
    /// leading integer never match.
    pub fn matches<R: EntityRecord>(&self, row: &R) -> bool {
        row.get(&self.field)
            .and_then(parse_int_prefix)
            .is_some_and(|cell| self.op.holds(cell, self.value))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op.symbol(), self.value)
    }
}

/// Rows matching `query`, in table order. Unparseable queries match nothing.
pub fn filter_rows<'a, R: EntityRecord>(query: &str, rows: &'a [R]) -> Vec<&'a R> {
    match Query::parse(query) {
        Some(q) => rows.iter().filter(|row| q.matches(*row)).collect(),
        None => Vec::new(),
    }
}

/// Indices of rows matching `query`, in table order.
pub fn filter_indices<R: EntityRecord>(query: &str, rows: &[R]) -> Vec<usize> {
    match Query::parse(query) {
        Some(q) => rows
            .iter()
            .enumerate()
            .filter(|(_, row)| q.matches(*row))
            .map(|(idx, _)| idx)
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TaskRecord;

    fn tasks(durations: &[&str]) -> Vec<TaskRecord> {
        durations
            .iter()
            .map(|d| TaskRecord::from_fields([("Duration", d.to_string())]))
            .collect()
    }

    #[test]
    fn test_greater_than() {
        let rows = tasks(&["1", "2"]);
        let matched = filter_rows("Duration > 1", &rows);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].get("Duration"), Some("2"));
    }

    #[test]
    fn test_malformed_query_is_empty() {
        let rows = tasks(&["1", "2"]);
        assert!(filter_rows("Duration >> 1", &rows).is_empty());
        assert!(filter_rows("Duration > x", &rows).is_empty());
        assert!(filter_rows("Duration > 1 and Duration < 5", &rows).is_empty());
        assert!(filter_rows("", &rows).is_empty());
    }

    #[test]
    fn test_all_operators() {
        let rows = tasks(&["1", "2", "3"]);
        assert_eq!(filter_indices("Duration>=2", &rows), vec![1, 2]);
        assert_eq!(filter_indices("Duration<=2", &rows), vec![0, 1]);
        assert_eq!(filter_indices("Duration<2", &rows), vec![0]);
        assert_eq!(filter_indices("  Duration = 3  ", &rows), vec![2]);
    }

    #[test]
    fn test_field_is_case_sensitive() {
        let rows = tasks(&["5"]);
        assert!(filter_rows("duration > 1", &rows).is_empty());
    }

    #[test]
    fn test_leading_numeric_prefix_and_non_numeric_rows() {
        let rows = tasks(&["4 days", "n/a", "2.9"]);
        assert_eq!(filter_indices("Duration > 2", &rows), vec![0]);
        assert_eq!(filter_indices("Duration = 2", &rows), vec![2]);
    }

    #[test]
    fn test_parse_and_display() {
        let q = Query::parse("PriorityLevel>=3").unwrap();
        assert_eq!(q.field, "PriorityLevel");
        assert_eq!(q.op, Comparison::GreaterOrEqual);
        assert_eq!(q.value, 3);
        assert_eq!(q.to_string(), "PriorityLevel >= 3");
    }
}
