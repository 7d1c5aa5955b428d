//! Relations catalog reader

use crate::adapter::{CatalogError, ContainerConnection};
use crate::schema_catalog::SchemaCatalog;
use relcheck_core::{RelationEntry, RELATIONS_TABLE};
use std::collections::HashSet;

/// Reads the `gpkgext_relations` catalog
#[derive(Clone, Copy)]
pub struct RelationsCatalog<'c> {
    conn: &'c dyn ContainerConnection,
}

impl<'c> RelationsCatalog<'c> {
    pub fn new(conn: &'c dyn ContainerConnection) -> Self {
        Self { conn }
    }

    /// Whether the relations catalog table exists at all
    pub fn exists(&self) -> Result<bool, CatalogError> {
        SchemaCatalog::new(self.conn).table_exists(RELATIONS_TABLE)
    }

    /// All rows with the given relation name; empty when the catalog is absent
    pub fn entries(&self, relation_name: &str) -> Result<Vec<RelationEntry>, CatalogError> {
        if !self.exists()? {
            return Ok(Vec::new());
        }

        self.conn.relations(relation_name)
    }

    /// Distinct related table names for a relation name
    ///
    /// Order follows the catalog's row order; a table related more than once
    /// is listed once. Empty both when no rows match and when the catalog is
    /// absent, so callers that care must check [`exists`](Self::exists).
    pub fn related_tables(&self, relation_name: &str) -> Result<Vec<String>, CatalogError> {
        let mut seen = HashSet::new();
        let tables: Vec<String> = self
            .entries(relation_name)?
            .into_iter()
            .map(|entry| entry.related_table_name)
            .filter(|name| seen.insert(name.clone()))
            .collect();

        tracing::debug!(relation_name, tables = tables.len(), "read related tables");
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockContainer;

    #[test]
    fn test_absent_catalog_reads_as_empty() {
        let container = MockContainer::new();
        let relations = RelationsCatalog::new(&container);

        assert!(!relations.exists().unwrap());
        assert!(relations.related_tables("media").unwrap().is_empty());
    }

    #[test]
    fn test_related_tables_are_distinct_in_row_order() {
        let container = MockContainer::new()
            .with_related_tables_extension()
            .with_relation("media", "videos")
            .with_relation("media", "photos")
            .with_relation("media", "videos")
            .with_relation("simple_attributes", "info");
        let relations = RelationsCatalog::new(&container);

        assert_eq!(relations.related_tables("media").unwrap(), vec!["videos", "photos"]);
        assert_eq!(relations.related_tables("simple_attributes").unwrap(), vec!["info"]);
        assert!(relations.related_tables("features").unwrap().is_empty());
    }

    #[test]
    fn test_entries_keep_duplicates() {
        let container = MockContainer::new()
            .with_related_tables_extension()
            .with_relation("media", "photos")
            .with_relation("media", "photos");

        assert_eq!(RelationsCatalog::new(&container).entries("media").unwrap().len(), 2);
    }
}
