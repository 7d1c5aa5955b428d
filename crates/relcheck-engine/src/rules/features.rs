//! Related Features conformance class (`/conf/features`)
//!
//! Structural checks belong to the injected [`FeatureTableValidator`]; this
//! rule set only fixes the order they run in.

use super::RuleSet;
use crate::error::CheckError;
use crate::feature_validator::FeatureTableValidator;
use relcheck_catalog::{ContainerConnection, SchemaCatalog};
use relcheck_core::ConformanceClass;

/// Rule set for related feature tables
pub struct FeaturesRules<'v> {
    validator: &'v dyn FeatureTableValidator,
    check_geometry_values: bool,
}

impl<'v> FeaturesRules<'v> {
    pub fn new(validator: &'v dyn FeatureTableValidator) -> Self {
        Self {
            validator,
            check_geometry_values: true,
        }
    }

    /// Enable or disable the per-row geometry check
    pub fn with_geometry_values(mut self, enabled: bool) -> Self {
        self.check_geometry_values = enabled;
        self
    }
}

impl RuleSet for FeaturesRules<'_> {
    fn class(&self) -> ConformanceClass {
        ConformanceClass::Features
    }

    fn validate_table(&self, conn: &dyn ContainerConnection, table: &str) -> Result<(), CheckError> {
        self.validate_tables(conn, &[table.to_string()])
    }

    fn validate_tables(&self, conn: &dyn ContainerConnection, tables: &[String]) -> Result<(), CheckError> {
        self.validator.validate_integer_primary_key(conn, tables)?;
        self.validator.validate_geometry_column_type(conn, tables)?;
        self.validator.validate_single_geometry_column(conn, tables)?;

        if !self.check_geometry_values {
            tracing::debug!("geometry value check disabled");
            return Ok(());
        }

        let catalog = SchemaCatalog::new(conn);
        for table in tables {
            for geometry in catalog.geometry_columns(table)? {
                self.validator
                    .validate_geometry_values(conn, table, &geometry.column_name)?;
            }
        }
        Ok(())
    }
}
