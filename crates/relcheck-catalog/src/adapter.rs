//! Container connection trait for reading GeoPackage catalogs

use relcheck_core::{ColumnDescriptor, GeometryColumn, RelationEntry};
use std::ops::ControlFlow;

/// Errors that can occur when reading from a container
///
/// Any of these is fatal for the check in progress; the container is a
/// static file, so nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to open container: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// A single value read from a table cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    /// SQLite storage class name of the value
    pub fn storage_class(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Real(_) => "REAL",
            Self::Text(_) => "TEXT",
            Self::Blob(_) => "BLOB",
        }
    }
}

/// Read-only access to an open GeoPackage container
///
/// Implementations never open or close the underlying file on behalf of the
/// engine; they wrap a connection the caller already owns.
pub trait ContainerConnection {
    /// Label for logs and reports (usually the file path)
    fn name(&self) -> &str;

    /// Whether a table or view with this name exists (ASCII case-insensitive)
    fn object_exists(&self, name: &str) -> Result<bool, CatalogError>;

    /// `PRAGMA table_info` for a table; empty when the table does not exist
    fn table_info(&self, table: &str) -> Result<Vec<ColumnDescriptor>, CatalogError>;

    /// Rows of `gpkgext_relations` with the given `relation_name`, in row order
    ///
    /// The relations catalog must exist; callers check first.
    fn relations(&self, relation_name: &str) -> Result<Vec<RelationEntry>, CatalogError>;

    /// Rows of `gpkg_geometry_columns` registered for a table
    ///
    /// The geometry column registry must exist; callers check first.
    fn geometry_columns(&self, table: &str) -> Result<Vec<GeometryColumn>, CatalogError>;

    /// Visit the values of one column in table scan order, one row at a time
    ///
    /// `visit` receives the 1-based row number and the value. Returning
    /// `ControlFlow::Break` stops the scan before the next row is read.
    fn scan_column(
        &self,
        table: &str,
        column: &str,
        visit: &mut dyn FnMut(usize, CellValue) -> ControlFlow<()>,
    ) -> Result<(), CatalogError>;
}
