//! Conformance classes of the Related Tables extension and their failures

use serde::{Deserialize, Serialize};
use crate::diagnostic::DiagnosticCode;

/// Name of the GeoPackage extension registry table
pub const EXTENSIONS_TABLE: &str = "gpkg_extensions";

/// Name of the Related Tables relations catalog
pub const RELATIONS_TABLE: &str = "gpkgext_relations";

/// Name of the GeoPackage geometry column registry
pub const GEOMETRY_COLUMNS_TABLE: &str = "gpkg_geometry_columns";

/// Conformance classes of the Related Tables extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConformanceClass {
    /// Related Features (`/conf/relatedfeat`)
    Features,

    /// Media (`/conf/media`)
    Media,

    /// Simple Attributes (`/conf/simpleattr`)
    SimpleAttributes,
}

impl ConformanceClass {
    /// All classes in evaluation order
    pub const ALL: [ConformanceClass; 3] = [Self::Features, Self::Media, Self::SimpleAttributes];

    /// Value of `gpkgext_relations.relation_name` selecting this class
    pub fn relation_name(&self) -> &'static str {
        match self {
            Self::Features => "features",
            Self::Media => "media",
            Self::SimpleAttributes => "simple_attributes",
        }
    }

    /// Catalog tables that must exist before the class can be in use
    pub fn required_catalog_tables(&self) -> &'static [&'static str] {
        &[EXTENSIONS_TABLE, RELATIONS_TABLE]
    }

    /// Human-readable class name used in diagnostics
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Features => "Related Tables Extension Related Features Conformance Class",
            Self::Media => "Related Tables Extension Media Conformance Class",
            Self::SimpleAttributes => "Related Tables Extension Simple Attributes Conformance Class",
        }
    }

    /// Parse from the relation name (`features`, `media`, `simple_attributes`)
    pub fn from_relation_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.relation_name() == name)
    }
}

impl std::fmt::Display for ConformanceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.relation_name())
    }
}

/// A structural violation found while checking a conformance class
///
/// Display output is matched on by conformance-suite consumers, so message
/// texts must not change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConformanceError {
    #[error("Conformance class {} is not in use.", .class.display_name())]
    ConformanceClassNotApplicable { class: ConformanceClass },

    #[error("The related table {table} does not exist.")]
    TableNotFound { table: String },

    #[error("The features or attributes table {table} does not have a primary key. expected [true] but found [false]")]
    NoPrimaryKey { table: String },

    #[error("The features or attributes table {table} has a composite primary key ({}). expected [1] but found [{}]", .columns.join(", "), .columns.len())]
    AmbiguousPrimaryKey { table: String, columns: Vec<String> },

    #[error("The media table {table} failed test missing column(s). expected [true] but found [false]")]
    MissingRequiredColumns { table: String },

    #[error("The media table {table} failed test {property}. expected [{expected}] but found [{actual}]")]
    InvalidColumnProperty {
        table: String,
        property: String,
        expected: String,
        actual: String,
    },

    #[error("Column {column} of table {table} is supposed to have a {property} of {expected} but found {actual}.")]
    InvalidColumnDefinition {
        table: String,
        column: String,
        property: String,
        expected: String,
        actual: String,
    },

    #[error("The simple attributes table {table} is missing column(s). expected [true] but found [false]")]
    MissingColumn { table: String },

    #[error("The simple attributes table {table} has invalid data type {declared_type}.")]
    InvalidAttributeType { table: String, declared_type: String },

    #[error("The feature table {table} does not have an INTEGER primary key column.")]
    NoIntegerPrimaryKey { table: String },

    #[error("The feature table {table} does not have the registered geometry column {column}.")]
    MissingGeometryColumn { table: String, column: String },

    #[error("The geometry column {column} of feature table {table} has an invalid type. expected [{expected}] but found [{actual}]")]
    InvalidGeometryColumnType {
        table: String,
        column: String,
        expected: String,
        actual: String,
    },

    #[error("The feature table {table} must have exactly one geometry column. expected [1] but found [{count}]")]
    GeometryColumnCount { table: String, count: usize },

    #[error("Invalid geometry in column {column} of feature table {table} at row {row}: {detail}")]
    InvalidGeometry {
        table: String,
        column: String,
        row: usize,
        detail: String,
    },
}

impl ConformanceError {
    /// Stable code for this failure
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::ConformanceClassNotApplicable { .. } => DiagnosticCode::ConformanceClassNotApplicable,
            Self::TableNotFound { .. } => DiagnosticCode::TableNotFound,
            Self::NoPrimaryKey { .. } => DiagnosticCode::NoPrimaryKey,
            Self::AmbiguousPrimaryKey { .. } => DiagnosticCode::AmbiguousPrimaryKey,
            Self::MissingRequiredColumns { .. } => DiagnosticCode::MissingRequiredColumns,
            Self::InvalidColumnProperty { .. } => DiagnosticCode::InvalidColumnProperty,
            Self::InvalidColumnDefinition { .. } => DiagnosticCode::InvalidColumnDefinition,
            Self::MissingColumn { .. } => DiagnosticCode::MissingColumn,
            Self::InvalidAttributeType { .. } => DiagnosticCode::InvalidAttributeType,
            Self::NoIntegerPrimaryKey { .. } => DiagnosticCode::NoIntegerPrimaryKey,
            Self::MissingGeometryColumn { .. } => DiagnosticCode::MissingGeometryColumn,
            Self::InvalidGeometryColumnType { .. } => DiagnosticCode::InvalidGeometryColumnType,
            Self::GeometryColumnCount { .. } => DiagnosticCode::GeometryColumnCount,
            Self::InvalidGeometry { .. } => DiagnosticCode::InvalidGeometry,
        }
    }

    /// True for the one expected outcome: the file does not use the class
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::ConformanceClassNotApplicable { .. })
    }

    /// Table the failure was found in, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::ConformanceClassNotApplicable { .. } => None,
            Self::TableNotFound { table }
            | Self::NoPrimaryKey { table }
            | Self::AmbiguousPrimaryKey { table, .. }
            | Self::MissingRequiredColumns { table }
            | Self::InvalidColumnProperty { table, .. }
            | Self::InvalidColumnDefinition { table, .. }
            | Self::MissingColumn { table }
            | Self::InvalidAttributeType { table, .. }
            | Self::NoIntegerPrimaryKey { table }
            | Self::MissingGeometryColumn { table, .. }
            | Self::InvalidGeometryColumnType { table, .. }
            | Self::GeometryColumnCount { table, .. }
            | Self::InvalidGeometry { table, .. } => Some(table),
        }
    }

    /// Column the failure was found in, if any
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::InvalidColumnDefinition { column, .. }
            | Self::MissingGeometryColumn { column, .. }
            | Self::InvalidGeometryColumnType { column, .. }
            | Self::InvalidGeometry { column, .. } => Some(column),
            _ => None,
        }
    }

    /// Expected/actual pair for comparison failures
    pub fn comparison(&self) -> Option<(String, String)> {
        match self {
            Self::InvalidColumnProperty { expected, actual, .. }
            | Self::InvalidColumnDefinition { expected, actual, .. }
            | Self::InvalidGeometryColumnType { expected, actual, .. } => {
                Some((expected.clone(), actual.clone()))
            }
            Self::NoPrimaryKey { .. }
            | Self::MissingRequiredColumns { .. }
            | Self::MissingColumn { .. } => Some(("true".to_string(), "false".to_string())),
            Self::AmbiguousPrimaryKey { columns, .. } => Some(("1".to_string(), columns.len().to_string())),
            Self::GeometryColumnCount { count, .. } => Some(("1".to_string(), count.to_string())),
            Self::InvalidAttributeType { declared_type, .. } => {
                Some(("non-BLOB affinity".to_string(), declared_type.clone()))
            }
            _ => None,
        }
    }
}
