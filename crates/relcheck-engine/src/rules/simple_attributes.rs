//! Simple Attributes conformance class (`/conf/simpleattr/table_def`)
//!
//! Besides its primary key, a simple attributes table must have at least one
//! column, and every such column must be NOT NULL and must not resolve to
//! BLOB affinity.

use super::{existing_table_schema, RuleSet};
use crate::error::CheckError;
use crate::primary_key::primary_key_column;
use relcheck_catalog::ContainerConnection;
use relcheck_core::{Affinity, ConformanceClass, ConformanceError, TableSchema};

/// Rule set for related simple attributes tables
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleAttributesRules;

impl SimpleAttributesRules {
    /// Check one simple attributes table's column metadata
    pub fn check_schema(&self, schema: &TableSchema) -> Result<(), ConformanceError> {
        let pk = primary_key_column(schema)?;

        let mut found_valid_column = false;
        for column in schema.columns.iter().filter(|c| c.name != pk) {
            if !column.not_null {
                return Err(ConformanceError::InvalidColumnDefinition {
                    table: schema.table.clone(),
                    column: column.name.clone(),
                    property: "notnull".to_string(),
                    expected: "1".to_string(),
                    actual: "0".to_string(),
                });
            }

            if column.affinity() == Affinity::Blob {
                return Err(ConformanceError::InvalidAttributeType {
                    table: schema.table.clone(),
                    declared_type: column.declared_type.clone(),
                });
            }

            found_valid_column = true;
        }

        if !found_valid_column {
            return Err(ConformanceError::MissingColumn {
                table: schema.table.clone(),
            });
        }

        Ok(())
    }
}

impl RuleSet for SimpleAttributesRules {
    fn class(&self) -> ConformanceClass {
        ConformanceClass::SimpleAttributes
    }

    fn validate_table(&self, conn: &dyn ContainerConnection, table: &str) -> Result<(), CheckError> {
        let schema = existing_table_schema(conn, table)?;
        Ok(self.check_schema(&schema)?)
    }
}
