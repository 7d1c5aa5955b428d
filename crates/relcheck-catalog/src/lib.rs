//! Container catalog access for Related Tables conformance checks
//!
//! This crate reads the schema metadata a GeoPackage container exposes:
//! column metadata of any table, the `gpkgext_relations` catalog, the
//! `gpkg_geometry_columns` registry, and raw column values.
//!
//! ## Example
//!
//! ```rust,ignore
//! use relcheck_catalog::{SqliteContainer, SchemaCatalog, RelationsCatalog};
//!
//! let container = SqliteContainer::open(Path::new("sample.gpkg"))?;
//! let media_tables = RelationsCatalog::new(&container).related_tables("media")?;
//! let schema = SchemaCatalog::new(&container).columns(&media_tables[0])?;
//! ```

pub mod adapter;
pub mod sqlite;
pub mod mock;
pub mod schema_catalog;
pub mod relations;

pub use adapter::{CatalogError, CellValue, ContainerConnection};
pub use sqlite::SqliteContainer;
pub use mock::MockContainer;
pub use schema_catalog::SchemaCatalog;
pub use relations::RelationsCatalog;
