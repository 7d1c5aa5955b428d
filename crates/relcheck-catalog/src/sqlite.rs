//! SQLite container adapter
//!
//! Reads GeoPackage catalogs through rusqlite. Schema introspection uses the
//! `pragma_table_info` table-valued function so table names are bound as
//! parameters instead of being spliced into SQL.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relcheck_catalog::{ContainerConnection, SqliteContainer};
//!
//! let container = SqliteContainer::open(Path::new("sample.gpkg"))?;
//! let columns = container.table_info("sample_media")?;
//! ```

use crate::adapter::{CatalogError, CellValue, ContainerConnection};
use relcheck_core::{ColumnDescriptor, GeometryColumn, RelationEntry};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};
use std::ops::ControlFlow;
use std::path::Path;

/// GeoPackage container backed by a SQLite connection
pub struct SqliteContainer {
    connection: Connection,
    label: String,
}

impl SqliteContainer {
    /// Open a GeoPackage file read-only
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        if !path.is_file() {
            return Err(CatalogError::Open(format!("{} is not a file", path.display())));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = Connection::open_with_flags(path, flags)
            .map_err(|e| CatalogError::Open(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "opened container read-only");

        Ok(Self {
            connection,
            label: path.display().to_string(),
        })
    }

    /// Wrap a connection the caller already opened
    pub fn from_connection(connection: Connection, label: impl Into<String>) -> Self {
        Self {
            connection,
            label: label.into(),
        }
    }

    /// Borrow the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

/// Quote an identifier for direct use in SQL
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn query_error(e: rusqlite::Error) -> CatalogError {
    CatalogError::Query(e.to_string())
}

impl ContainerConnection for SqliteContainer {
    fn name(&self) -> &str {
        &self.label
    }

    fn object_exists(&self, name: &str) -> Result<bool, CatalogError> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
                params![name],
                |row| row.get(0),
            )
            .map_err(query_error)?;

        Ok(count > 0)
    }

    fn table_info(&self, table: &str) -> Result<Vec<ColumnDescriptor>, CatalogError> {
        let mut stmt = self
            .connection
            .prepare("SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)")
            .map_err(query_error)?;

        let rows = stmt
            .query_map(params![table], |row| {
                let declared_type: Option<String> = row.get(1)?;
                let not_null: i64 = row.get(2)?;
                let pk: i64 = row.get(4)?;

                Ok(ColumnDescriptor {
                    name: row.get(0)?,
                    declared_type: declared_type.unwrap_or_default(),
                    not_null: not_null != 0,
                    default_value: row.get(3)?,
                    // pk is the 1-based position within the key, 0 when not part of it
                    is_primary_key: pk > 0,
                })
            })
            .map_err(query_error)?;

        let columns = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::InvalidRow(e.to_string()))?;

        tracing::debug!(table, columns = columns.len(), "read table_info");
        Ok(columns)
    }

    fn relations(&self, relation_name: &str) -> Result<Vec<RelationEntry>, CatalogError> {
        let mut stmt = self
            .connection
            .prepare(
                "SELECT relation_name, related_table_name FROM gpkgext_relations WHERE relation_name = ?1",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map(params![relation_name], |row| {
                let related: Option<String> = row.get(1)?;
                Ok(related.map(|related_table_name| RelationEntry {
                    relation_name: relation_name.to_string(),
                    related_table_name,
                }))
            })
            .map_err(query_error)?;

        let mut entries = Vec::new();
        for row in rows {
            match row.map_err(|e| CatalogError::InvalidRow(e.to_string()))? {
                Some(entry) => entries.push(entry),
                None => tracing::warn!(relation_name, "skipping relation row without related_table_name"),
            }
        }
        Ok(entries)
    }

    fn geometry_columns(&self, table: &str) -> Result<Vec<GeometryColumn>, CatalogError> {
        let mut stmt = self
            .connection
            .prepare(
                "SELECT table_name, column_name, geometry_type_name FROM gpkg_geometry_columns WHERE table_name = ?1 COLLATE NOCASE",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map(params![table], |row| {
                Ok(GeometryColumn {
                    table_name: row.get(0)?,
                    column_name: row.get(1)?,
                    geometry_type_name: row.get(2)?,
                })
            })
            .map_err(query_error)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::InvalidRow(e.to_string()))
    }

    fn scan_column(
        &self,
        table: &str,
        column: &str,
        visit: &mut dyn FnMut(usize, CellValue) -> ControlFlow<()>,
    ) -> Result<(), CatalogError> {
        let sql = format!("SELECT {} FROM {}", quote_identifier(column), quote_identifier(table));
        let mut stmt = self.connection.prepare(&sql).map_err(query_error)?;
        let mut rows = stmt.query([]).map_err(query_error)?;

        let mut row_number = 0;
        while let Some(row) = rows.next().map_err(|e| CatalogError::InvalidRow(e.to_string()))? {
            row_number += 1;
            let value = match row.get_ref(0).map_err(|e| CatalogError::InvalidRow(e.to_string()))? {
                ValueRef::Null => CellValue::Null,
                ValueRef::Integer(i) => CellValue::Integer(i),
                ValueRef::Real(r) => CellValue::Real(r),
                ValueRef::Text(t) => CellValue::Text(String::from_utf8_lossy(t).into_owned()),
                ValueRef::Blob(b) => CellValue::Blob(b.to_vec()),
            };

            if visit(row_number, value).is_break() {
                tracing::debug!(table, column, rows = row_number, "column scan stopped early");
                break;
            }
        }

        Ok(())
    }
}
