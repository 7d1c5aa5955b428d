//! Test fixtures for container adapter integration tests
//!
//! Builds small GeoPackage-shaped SQLite databases: the core
//! `gpkg_extensions` / `gpkg_geometry_columns` registries, the Related Tables
//! `gpkgext_relations` catalog, and a handful of related tables.

use rusqlite::Connection;

/// Registry tables every Related Tables container carries
pub const CATALOG_DDL: &str = "
    CREATE TABLE gpkg_extensions (
        table_name TEXT,
        column_name TEXT,
        extension_name TEXT NOT NULL,
        definition TEXT NOT NULL,
        scope TEXT NOT NULL
    );
    CREATE TABLE gpkgext_relations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        base_table_name TEXT NOT NULL,
        base_primary_column TEXT NOT NULL DEFAULT 'id',
        related_table_name TEXT NOT NULL,
        related_primary_column TEXT NOT NULL DEFAULT 'id',
        relation_name TEXT NOT NULL,
        mapping_table_name TEXT NOT NULL UNIQUE
    );
    CREATE TABLE gpkg_geometry_columns (
        table_name TEXT NOT NULL,
        column_name TEXT NOT NULL,
        geometry_type_name TEXT NOT NULL,
        srs_id INTEGER NOT NULL,
        z TINYINT NOT NULL,
        m TINYINT NOT NULL
    );
    INSERT INTO gpkg_extensions VALUES (
        'gpkgext_relations', NULL, 'related_tables',
        'http://www.geopackage.org/18-000.html', 'read-write'
    );
";

/// A media table, a simple attributes table and their relations
pub const RELATED_TABLES_DDL: &str = "
    CREATE TABLE sample_media (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        data BLOB NOT NULL,
        content_type TEXT NOT NULL
    );
    CREATE TABLE info (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT NOT NULL
    );
    INSERT INTO gpkgext_relations
        (base_table_name, related_table_name, relation_name, mapping_table_name)
    VALUES
        ('roads', 'sample_media', 'media', 'roads_sample_media'),
        ('roads', 'info', 'simple_attributes', 'roads_info'),
        ('parks', 'sample_media', 'media', 'parks_sample_media');
";

/// In-memory database with the given DDL applied
pub fn memory_db(ddl: &[&str]) -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory database");
    for batch in ddl {
        connection.execute_batch(batch).expect("fixture DDL");
    }
    connection
}

/// Write a database with the given DDL to a file
pub fn file_db(path: &std::path::Path, ddl: &[&str]) {
    let connection = Connection::open(path).expect("fixture file");
    for batch in ddl {
        connection.execute_batch(batch).expect("fixture DDL");
    }
}
