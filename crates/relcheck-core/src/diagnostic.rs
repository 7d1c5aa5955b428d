//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};
use crate::conformance::{ConformanceClass, ConformanceError};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Applicability (1xxx)
    /// The container does not use the conformance class
    ConformanceClassNotApplicable,

    // Shared table structure (2xxx)
    /// A table named in the relations catalog does not exist
    TableNotFound,

    /// No primary key column
    NoPrimaryKey,

    /// More than one primary key column
    AmbiguousPrimaryKey,

    // Media (3xxx)
    /// `data` and/or `content_type` column missing
    MissingRequiredColumns,

    /// A required media column has the wrong type, nullability, default or key flag
    InvalidColumnProperty,

    // Simple attributes (4xxx)
    /// An attribute column violates its column definition
    InvalidColumnDefinition,

    /// No attribute column besides the primary key
    MissingColumn,

    /// An attribute column resolves to BLOB affinity
    InvalidAttributeType,

    // Related features (5xxx)
    /// Feature table has no INTEGER primary key
    NoIntegerPrimaryKey,

    /// Registered geometry column absent from the table
    MissingGeometryColumn,

    /// Geometry column type differs from its registration
    InvalidGeometryColumnType,

    /// Feature table does not have exactly one geometry column
    GeometryColumnCount,

    /// Malformed geometry value
    InvalidGeometry,

    // Outcomes (9xxx)
    /// Conformance class checked and passed
    ClassPassed,

    /// Conformance class skipped
    ClassSkipped,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConformanceClassNotApplicable => "CONFORMANCE_CLASS_NOT_APPLICABLE",
            Self::TableNotFound => "TABLE_NOT_FOUND",
            Self::NoPrimaryKey => "NO_PRIMARY_KEY",
            Self::AmbiguousPrimaryKey => "AMBIGUOUS_PRIMARY_KEY",
            Self::MissingRequiredColumns => "MISSING_REQUIRED_COLUMNS",
            Self::InvalidColumnProperty => "INVALID_COLUMN_PROPERTY",
            Self::InvalidColumnDefinition => "INVALID_COLUMN_DEFINITION",
            Self::MissingColumn => "MISSING_COLUMN",
            Self::InvalidAttributeType => "INVALID_ATTRIBUTE_TYPE",
            Self::NoIntegerPrimaryKey => "NO_INTEGER_PRIMARY_KEY",
            Self::MissingGeometryColumn => "MISSING_GEOMETRY_COLUMN",
            Self::InvalidGeometryColumnType => "INVALID_GEOMETRY_COLUMN_TYPE",
            Self::GeometryColumnCount => "GEOMETRY_COLUMN_COUNT",
            Self::InvalidGeometry => "INVALID_GEOMETRY",
            Self::ClassPassed => "CLASS_PASSED",
            Self::ClassSkipped => "CLASS_SKIPPED",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message (passed or skipped class)
    Info,

    /// Error - the container does not conform
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where in the container a diagnostic points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Table name
    pub table: String,

    /// Optional column name
    pub column: Option<String>,
}

impl Location {
    /// Create a new location with just a table name
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: None,
        }
    }

    /// Create a location with table and column
    pub fn with_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: Some(column.into()),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Conformance class the diagnostic belongs to
    pub class: ConformanceClass,

    /// Human-readable message
    pub message: String,

    /// Table/column the diagnostic points at
    pub location: Option<Location>,

    /// Expected value (for comparison diagnostics)
    pub expected: Option<String>,

    /// Actual value (for comparison diagnostics)
    pub actual: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(
        code: DiagnosticCode,
        severity: Severity,
        class: ConformanceClass,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            class,
            message: message.into(),
            location: None,
            expected: None,
            actual: None,
        }
    }

    /// Build a diagnostic from a conformance failure
    pub fn from_error(class: ConformanceClass, severity: Severity, error: &ConformanceError) -> Self {
        let mut diag = Self::new(error.code(), severity, class, error.to_string());

        if let Some(table) = error.table() {
            diag.location = Some(match error.column() {
                Some(column) => Location::with_column(table, column),
                None => Location::new(table),
            });
        }

        if let Some((expected, actual)) = error.comparison() {
            diag = diag.with_comparison(expected, actual);
        }

        diag
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set expected/actual values
    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        // Ensure codes are stable strings
        assert_eq!(DiagnosticCode::NoPrimaryKey.as_str(), "NO_PRIMARY_KEY");
        assert_eq!(
            DiagnosticCode::ConformanceClassNotApplicable.as_str(),
            "CONFORMANCE_CLASS_NOT_APPLICABLE"
        );
    }

    #[test]
    fn diagnostic_from_error_carries_structure() {
        let error = ConformanceError::InvalidColumnProperty {
            table: "sample_media".to_string(),
            property: "content_type notnull".to_string(),
            expected: "1".to_string(),
            actual: "0".to_string(),
        };

        let diag = Diagnostic::from_error(ConformanceClass::Media, Severity::Error, &error);
        assert_eq!(diag.code, DiagnosticCode::InvalidColumnProperty);
        assert_eq!(diag.location, Some(Location::new("sample_media")));
        assert_eq!(diag.expected.as_deref(), Some("1"));
        assert_eq!(diag.actual.as_deref(), Some("0"));
        assert_eq!(diag.message, error.to_string());
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::new(
            DiagnosticCode::MissingColumn,
            Severity::Error,
            ConformanceClass::SimpleAttributes,
            "The simple attributes table info is missing column(s).",
        )
        .with_location(Location::with_column("info", "label"));

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("MISSING_COLUMN"));
        assert!(json.contains("error"));
        assert!(json.contains("simple_attributes"));
    }
}
