//! Schema catalog reader
//!
//! Answers "does this object exist" and "what columns does this table have"
//! against a container. Every call reads the live catalog; nothing is cached.

use crate::adapter::{CatalogError, ContainerConnection};
use relcheck_core::{GeometryColumn, TableSchema, GEOMETRY_COLUMNS_TABLE};

/// Reads table-level metadata from a container
#[derive(Clone, Copy)]
pub struct SchemaCatalog<'c> {
    conn: &'c dyn ContainerConnection,
}

impl<'c> SchemaCatalog<'c> {
    pub fn new(conn: &'c dyn ContainerConnection) -> Self {
        Self { conn }
    }

    /// Whether a table or view exists
    pub fn table_exists(&self, name: &str) -> Result<bool, CatalogError> {
        self.conn.object_exists(name)
    }

    /// Column metadata of a table
    ///
    /// A table that does not exist yields an empty schema; use
    /// [`table_exists`](Self::table_exists) to tell the two apart.
    pub fn columns(&self, table: &str) -> Result<TableSchema, CatalogError> {
        let columns = self.conn.table_info(table)?;
        Ok(TableSchema::new(table, columns))
    }

    /// Geometry columns registered for a table
    ///
    /// Empty when the container has no `gpkg_geometry_columns` table.
    pub fn geometry_columns(&self, table: &str) -> Result<Vec<GeometryColumn>, CatalogError> {
        if !self.table_exists(GEOMETRY_COLUMNS_TABLE)? {
            tracing::debug!(table, "no geometry column registry");
            return Ok(Vec::new());
        }

        self.conn.geometry_columns(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockContainer;
    use relcheck_core::ColumnDescriptor;

    #[test]
    fn test_columns_of_absent_table_are_empty() {
        let container = MockContainer::new();
        let catalog = SchemaCatalog::new(&container);

        assert!(!catalog.table_exists("nope").unwrap());
        let schema = catalog.columns("nope").unwrap();
        assert!(schema.is_absent());
        assert_eq!(schema.table, "nope");
    }

    #[test]
    fn test_columns_keep_native_order() {
        let container = MockContainer::new().with_table(TableSchema::new(
            "info",
            vec![
                ColumnDescriptor::new("label", "TEXT"),
                ColumnDescriptor::new("id", "INTEGER").with_primary_key(true),
            ],
        ));
        let catalog = SchemaCatalog::new(&container);

        assert_eq!(catalog.columns("info").unwrap().column_names(), vec!["label", "id"]);
    }

    #[test]
    fn test_geometry_columns_without_registry() {
        let container = MockContainer::new();
        let catalog = SchemaCatalog::new(&container);
        assert!(catalog.geometry_columns("roads").unwrap().is_empty());
    }

    #[test]
    fn test_geometry_columns_with_registry() {
        let container = MockContainer::new()
            .with_geometry_column(GeometryColumn::new("roads", "geom", "LINESTRING"))
            .with_geometry_column(GeometryColumn::new("parks", "shape", "POLYGON"));
        let catalog = SchemaCatalog::new(&container);

        let columns = catalog.geometry_columns("roads").unwrap();
        assert_eq!(columns, vec![GeometryColumn::new("roads", "geom", "LINESTRING")]);
    }
}
