//! Mock container for testing
//!
//! This container answers catalog queries from in-memory fixtures without
//! touching SQLite. It's useful for:
//! - Unit testing rule sets against hand-built schemas
//! - Simulating catalog read failures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relcheck_catalog::{MockContainer, ContainerConnection};
//! use relcheck_core::{ColumnDescriptor, TableSchema};
//!
//! let container = MockContainer::new()
//!     .with_related_tables_extension()
//!     .with_table(TableSchema::new("photos", vec![
//!         ColumnDescriptor::new("id", "INTEGER").with_primary_key(true),
//!     ]))
//!     .with_relation("media", "photos");
//! ```

use crate::adapter::{CatalogError, CellValue, ContainerConnection};
use relcheck_core::{
    ColumnDescriptor, GeometryColumn, RelationEntry, TableSchema, EXTENSIONS_TABLE,
    GEOMETRY_COLUMNS_TABLE, RELATIONS_TABLE,
};
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

/// In-memory container for testing
#[derive(Debug, Clone, Default)]
pub struct MockContainer {
    /// Tables and views that exist (including catalog tables), lowercased
    objects: HashSet<String>,

    /// Column metadata by lowercased table name
    tables: HashMap<String, Vec<ColumnDescriptor>>,

    /// Relations catalog rows, in insertion order
    relations: Vec<RelationEntry>,

    /// Geometry column registry rows, in insertion order
    geometry_columns: Vec<GeometryColumn>,

    /// Column contents by (table, column)
    values: HashMap<(String, String), Vec<CellValue>>,

    /// Errors to return for any query touching a given table
    errors: HashMap<String, CatalogError>,

    /// Rows handed out by `scan_column` so far
    rows_scanned: Cell<usize>,
}

/// SQLite table names ignore ASCII case
fn key(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl MockContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object (table or view) without column metadata
    pub fn with_object(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.objects.insert(key(&name));
        self
    }

    /// Register the `gpkg_extensions` and `gpkgext_relations` catalog tables
    pub fn with_related_tables_extension(self) -> Self {
        self.with_object(EXTENSIONS_TABLE).with_object(RELATIONS_TABLE)
    }

    /// Register a table with its columns
    pub fn with_table(mut self, schema: TableSchema) -> Self {
        self.objects.insert(key(&schema.table));
        self.tables.insert(key(&schema.table), schema.columns);
        self
    }

    /// Add a relations catalog row
    pub fn with_relation(mut self, relation_name: &str, related_table_name: &str) -> Self {
        self.relations.push(RelationEntry::new(relation_name, related_table_name));
        self
    }

    /// Add a geometry column registration (also registers the registry table)
    pub fn with_geometry_column(mut self, column: GeometryColumn) -> Self {
        self.objects.insert(key(GEOMETRY_COLUMNS_TABLE));
        self.geometry_columns.push(column);
        self
    }

    /// Set the contents of one column
    pub fn with_values(mut self, table: &str, column: &str, values: Vec<CellValue>) -> Self {
        self.values.insert((key(table), column.to_string()), values);
        self
    }

    /// Configure an error to be returned for any query on a table
    pub fn with_error_for_table(mut self, table: &str, error: CatalogError) -> Self {
        self.errors.insert(key(table), error);
        self
    }

    /// Number of rows `scan_column` has handed to visitors
    pub fn rows_scanned(&self) -> usize {
        self.rows_scanned.get()
    }

    fn check_error(&self, table: &str) -> Result<(), CatalogError> {
        match self.errors.get(&key(table)) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn require_object(&self, name: &str) -> Result<(), CatalogError> {
        self.check_error(name)?;
        if self.objects.contains(&key(name)) {
            Ok(())
        } else {
            Err(CatalogError::Query(format!("no such table: {}", name)))
        }
    }
}

impl ContainerConnection for MockContainer {
    fn name(&self) -> &str {
        "mock"
    }

    fn object_exists(&self, name: &str) -> Result<bool, CatalogError> {
        self.check_error(name)?;
        Ok(self.objects.contains(&key(name)))
    }

    fn table_info(&self, table: &str) -> Result<Vec<ColumnDescriptor>, CatalogError> {
        self.check_error(table)?;
        Ok(self.tables.get(&key(table)).cloned().unwrap_or_default())
    }

    fn relations(&self, relation_name: &str) -> Result<Vec<RelationEntry>, CatalogError> {
        self.require_object(RELATIONS_TABLE)?;
        Ok(self
            .relations
            .iter()
            .filter(|r| r.relation_name == relation_name)
            .cloned()
            .collect())
    }

    fn geometry_columns(&self, table: &str) -> Result<Vec<GeometryColumn>, CatalogError> {
        self.require_object(GEOMETRY_COLUMNS_TABLE)?;
        Ok(self
            .geometry_columns
            .iter()
            .filter(|g| g.table_name.eq_ignore_ascii_case(table))
            .cloned()
            .collect())
    }

    fn scan_column(
        &self,
        table: &str,
        column: &str,
        visit: &mut dyn FnMut(usize, CellValue) -> ControlFlow<()>,
    ) -> Result<(), CatalogError> {
        self.require_object(table)?;

        let Some(values) = self.values.get(&(key(table), column.to_string())) else {
            return Ok(());
        };

        for (index, value) in values.iter().enumerate() {
            self.rows_scanned.set(self.rows_scanned.get() + 1);
            if visit(index + 1, value.clone()).is_break() {
                break;
            }
        }
        Ok(())
    }
}
