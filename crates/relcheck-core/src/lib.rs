//! relcheck core
//!
//! Core domain model with stable, versioned types for checking GeoPackage
//! Related Tables extension conformance.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod conformance;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use schema::{Affinity, ColumnDescriptor, TableSchema, RelationEntry, GeometryColumn};
pub use conformance::{
    ConformanceClass, ConformanceError, EXTENSIONS_TABLE, GEOMETRY_COLUMNS_TABLE, RELATIONS_TABLE,
};
pub use report::{Report, ReportVersion, ReportSummary, ContainerInfo};
pub use config::{Config, ConfigError, NotApplicablePolicy};
