//! Feature table validation
//!
//! The Features conformance class hands its structural checks to a
//! [`FeatureTableValidator`]. [`GeoPackageFeatureValidator`] implements them
//! against the GeoPackage core rules: an INTEGER primary key, exactly one
//! registered geometry column whose declared type matches its registration,
//! and well-formed binary geometry values.

use crate::error::CheckError;
use crate::geometry::check_geometry;
use crate::rules::existing_table_schema;
use relcheck_catalog::{CellValue, ContainerConnection, SchemaCatalog};
use relcheck_core::ConformanceError;
use std::ops::ControlFlow;

/// Structural checks for related feature tables
pub trait FeatureTableValidator {
    /// Every table has a single INTEGER primary key
    fn validate_integer_primary_key(
        &self,
        conn: &dyn ContainerConnection,
        tables: &[String],
    ) -> Result<(), CheckError>;

    /// Every registered geometry column exists with its registered type
    fn validate_geometry_column_type(
        &self,
        conn: &dyn ContainerConnection,
        tables: &[String],
    ) -> Result<(), CheckError>;

    /// Every table has exactly one registered geometry column
    fn validate_single_geometry_column(
        &self,
        conn: &dyn ContainerConnection,
        tables: &[String],
    ) -> Result<(), CheckError>;

    /// Every value of a geometry column is a well-formed geometry
    fn validate_geometry_values(
        &self,
        conn: &dyn ContainerConnection,
        table: &str,
        column: &str,
    ) -> Result<(), CheckError>;
}

/// Default validator following the GeoPackage feature table rules
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoPackageFeatureValidator;

impl FeatureTableValidator for GeoPackageFeatureValidator {
    fn validate_integer_primary_key(
        &self,
        conn: &dyn ContainerConnection,
        tables: &[String],
    ) -> Result<(), CheckError> {
        for table in tables {
            let schema = existing_table_schema(conn, table)?;
            let keys = schema.primary_key_columns();

            let integer_key = keys.len() == 1 && keys[0].declared_type.eq_ignore_ascii_case("INTEGER");
            if !integer_key {
                return Err(ConformanceError::NoIntegerPrimaryKey {
                    table: table.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn validate_geometry_column_type(
        &self,
        conn: &dyn ContainerConnection,
        tables: &[String],
    ) -> Result<(), CheckError> {
        let catalog = SchemaCatalog::new(conn);

        for table in tables {
            let schema = existing_table_schema(conn, table)?;

            for registered in catalog.geometry_columns(table)? {
                let column = schema.find_column(&registered.column_name).ok_or_else(|| {
                    ConformanceError::MissingGeometryColumn {
                        table: table.clone(),
                        column: registered.column_name.clone(),
                    }
                })?;

                if !column.declared_type.eq_ignore_ascii_case(&registered.geometry_type_name) {
                    return Err(ConformanceError::InvalidGeometryColumnType {
                        table: table.clone(),
                        column: column.name.clone(),
                        expected: registered.geometry_type_name,
                        actual: column.declared_type.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn validate_single_geometry_column(
        &self,
        conn: &dyn ContainerConnection,
        tables: &[String],
    ) -> Result<(), CheckError> {
        let catalog = SchemaCatalog::new(conn);

        for table in tables {
            let count = catalog.geometry_columns(table)?.len();
            if count != 1 {
                return Err(ConformanceError::GeometryColumnCount {
                    table: table.clone(),
                    count,
                }
                .into());
            }
        }
        Ok(())
    }

    fn validate_geometry_values(
        &self,
        conn: &dyn ContainerConnection,
        table: &str,
        column: &str,
    ) -> Result<(), CheckError> {
        let mut defect = None;
        conn.scan_column(table, column, &mut |row, value| {
            let detail = match value {
                CellValue::Null => return ControlFlow::Continue(()),
                CellValue::Blob(blob) => match check_geometry(&blob) {
                    Ok(_) => return ControlFlow::Continue(()),
                    Err(e) => e.to_string(),
                },
                other => format!("Geometry value is not a BLOB (found {})", other.storage_class()),
            };
            defect = Some((row, detail));
            ControlFlow::Break(())
        })?;

        match defect {
            Some((row, detail)) => {
                tracing::debug!(table, column, row, "invalid geometry value");
                Err(ConformanceError::InvalidGeometry {
                    table: table.to_string(),
                    column: column.to_string(),
                    row,
                    detail,
                }
                .into())
            }
            None => Ok(()),
        }
    }
}
