//! Test fixtures for conformance checker integration tests
//!
//! `GeoPackage` builds an in-memory SQLite database carrying the GeoPackage
//! registries and the Related Tables catalog, then lets each test add the
//! related tables, relations and geometry rows it needs.

#![allow(dead_code)]

use relcheck_catalog::SqliteContainer;
use rusqlite::{params, Connection};

const REGISTRY_DDL: &str = "
    CREATE TABLE gpkg_extensions (
        table_name TEXT,
        column_name TEXT,
        extension_name TEXT NOT NULL,
        definition TEXT NOT NULL,
        scope TEXT NOT NULL
    );
    CREATE TABLE gpkg_geometry_columns (
        table_name TEXT NOT NULL,
        column_name TEXT NOT NULL,
        geometry_type_name TEXT NOT NULL,
        srs_id INTEGER NOT NULL,
        z TINYINT NOT NULL,
        m TINYINT NOT NULL
    );
";

const RELATIONS_DDL: &str = "
    CREATE TABLE gpkgext_relations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        base_table_name TEXT NOT NULL,
        base_primary_column TEXT NOT NULL DEFAULT 'id',
        related_table_name TEXT NOT NULL,
        related_primary_column TEXT NOT NULL DEFAULT 'id',
        relation_name TEXT NOT NULL,
        mapping_table_name TEXT NOT NULL UNIQUE
    );
    INSERT INTO gpkg_extensions VALUES (
        'gpkgext_relations', NULL, 'related_tables',
        'http://www.geopackage.org/18-000.html', 'read-write'
    );
";

/// A conforming media table
pub const SAMPLE_MEDIA: &str = "
    CREATE TABLE sample_media (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data BLOB NOT NULL,
        content_type TEXT NOT NULL
    );
";

/// A conforming simple attributes table
pub const INFO: &str = "
    CREATE TABLE info (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT NOT NULL
    );
";

/// GeoPackage-shaped database under construction
pub struct GeoPackage {
    connection: Connection,
    relations: usize,
}

impl GeoPackage {
    /// Core registries only, without the Related Tables catalog
    pub fn without_related_tables() -> Self {
        let connection = Connection::open_in_memory().expect("in-memory database");
        connection.execute_batch(REGISTRY_DDL).expect("registry DDL");
        Self { connection, relations: 0 }
    }

    /// Core registries plus an empty Related Tables catalog
    pub fn new() -> Self {
        let package = Self::without_related_tables();
        package.connection.execute_batch(RELATIONS_DDL).expect("relations DDL");
        package
    }

    /// Run arbitrary SQL
    pub fn sql(self, sql: &str) -> Self {
        self.connection.execute_batch(sql).expect("fixture SQL");
        self
    }

    /// Record a relation from `base` to `related`
    pub fn relate(mut self, base: &str, related: &str, relation_name: &str) -> Self {
        self.relations += 1;
        self.connection
            .execute(
                "INSERT INTO gpkgext_relations
                    (base_table_name, related_table_name, relation_name, mapping_table_name)
                 VALUES (?1, ?2, ?3, ?4)",
                params![base, related, relation_name, format!("mapping_{}", self.relations)],
            )
            .expect("relation row");
        self
    }

    /// Create and register a feature table with an INTEGER key and one geometry column
    pub fn feature_table(self, table: &str, geometry_type: &str) -> Self {
        self.connection
            .execute_batch(&format!(
                "CREATE TABLE \"{table}\" (fid INTEGER PRIMARY KEY AUTOINCREMENT, geom {geometry_type}, name TEXT);"
            ))
            .expect("feature table");
        self.register_geometry(table, "geom", geometry_type)
    }

    /// Add a `gpkg_geometry_columns` row
    pub fn register_geometry(self, table: &str, column: &str, geometry_type: &str) -> Self {
        self.connection
            .execute(
                "INSERT INTO gpkg_geometry_columns VALUES (?1, ?2, ?3, 4326, 0, 0)",
                params![table, column, geometry_type],
            )
            .expect("geometry column row");
        self
    }

    /// Insert one geometry value into a feature table's `geom` column
    pub fn geometry(self, table: &str, blob: Vec<u8>) -> Self {
        self.connection
            .execute(&format!("INSERT INTO \"{table}\" (geom) VALUES (?1)"), params![blob])
            .expect("geometry row");
        self
    }

    pub fn container(self) -> SqliteContainer {
        SqliteContainer::from_connection(self.connection, "fixture.gpkg")
    }
}

/// Little-endian GeoPackage point with no envelope
pub fn point_blob(x: f64, y: f64) -> Vec<u8> {
    let mut blob = vec![0x47, 0x50, 0x00, 0b0000_0001];
    blob.extend_from_slice(&4326i32.to_le_bytes());
    blob.push(1);
    blob.extend_from_slice(&1u32.to_le_bytes());
    blob.extend_from_slice(&x.to_le_bytes());
    blob.extend_from_slice(&y.to_le_bytes());
    blob
}
