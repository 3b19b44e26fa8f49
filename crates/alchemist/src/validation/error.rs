//! Validation error records.

use serde::{Deserialize, Serialize};

/// What kind of rule a cell violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required column absent or blank.
    MissingRequired,
    /// Identifier already used by an earlier row.
    Duplicate,
    /// Integer field non-numeric or outside its range.
    OutOfRange,
    /// `AttributesJSON` does not parse.
    MalformedJson,
    /// `RequestedTaskIDs` entry with no matching task.
    UnknownReference,
    /// `AvailableSlots` is neither a JSON number array nor a number list.
    MalformedSlots,
    /// Fewer available slots than the worker's max load.
    Overloaded,
    /// Required skill no worker has.
    UncoveredSkill,
}

impl ErrorKind {
    /// Get a human-readable label for the error kind.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequired => "Missing Required",
            ErrorKind::Duplicate => "Duplicate",
            ErrorKind::OutOfRange => "Out Of Range",
            ErrorKind::MalformedJson => "Malformed JSON",
            ErrorKind::UnknownReference => "Unknown Reference",
            ErrorKind::MalformedSlots => "Malformed Slots",
            ErrorKind::Overloaded => "Overloaded",
            ErrorKind::UncoveredSkill => "Uncovered Skill",
        }
    }

    /// Severity attached to this kind. Overload is a business-rule warning
    /// layered on top of an otherwise well-formed row.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::Overloaded => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Severity level of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Softer business-rule violation.
    Warning,
    /// Structural or referential error.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// One positional error: row index, column, message.
///
/// `row` is a zero-based index into the table as it was when validated; any
/// reorder or replacement of the table invalidates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    pub row: usize,
    #[serde(rename = "col")]
    pub column: String,
    pub message: String,
    pub kind: ErrorKind,
    pub severity: Severity,
}

impl ValidationError {
    /// Create an error with the severity implied by `kind`.
    pub fn new(
        row: usize,
        column: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            column: column.into(),
            message: message.into(),
            kind,
            severity: kind.severity(),
        }
    }

    /// Whether this error points at the given cell.
    pub fn is_at(&self, row: usize, column: &str) -> bool {
        self.row == row && self.column == column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overload_is_warning() {
        let err = ValidationError::new(0, "AvailableSlots", ErrorKind::Overloaded, "overloaded");
        assert_eq!(err.severity, Severity::Warning);
        let err = ValidationError::new(0, "ClientID", ErrorKind::Duplicate, "dup");
        assert_eq!(err.severity, Severity::Error);
    }

    #[test]
    fn test_serializes_col_key() {
        let err = ValidationError::new(2, "Duration", ErrorKind::OutOfRange, "Duration must be >= 1.");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["row"], 2);
        assert_eq!(json["col"], "Duration");
        assert_eq!(json["kind"], "out_of_range");
        assert_eq!(json["severity"], "error");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
    }
}
