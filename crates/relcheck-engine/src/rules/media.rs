//! Media conformance class (`/conf/media/table_def`)
//!
//! A media table needs a primary key plus two columns with exact
//! definitions:
//!
//! | column         | declared type | not null | default | primary key |
//! |----------------|---------------|----------|---------|-------------|
//! | `data`         | `BLOB`        | yes      | none    | no          |
//! | `content_type` | `TEXT`        | yes      | none    | no          |
//!
//! Declared types are compared as literal strings, not by affinity.

use super::{existing_table_schema, RuleSet};
use crate::error::CheckError;
use crate::primary_key::primary_key_column;
use relcheck_catalog::ContainerConnection;
use relcheck_core::{ColumnDescriptor, ConformanceClass, ConformanceError, TableSchema};

const DATA_SEEN: u8 = 0b01;
const CONTENT_TYPE_SEEN: u8 = 0b10;
const ALL_SEEN: u8 = DATA_SEEN | CONTENT_TYPE_SEEN;

/// Rule set for related media tables
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaRules;

impl MediaRules {
    /// Check one media table's column metadata
    pub fn check_schema(&self, schema: &TableSchema) -> Result<(), ConformanceError> {
        primary_key_column(schema)?;

        let mut seen = 0u8;
        for column in &schema.columns {
            match column.name.as_str() {
                "data" => {
                    check_column(&schema.table, column, "BLOB")?;
                    seen |= DATA_SEEN;
                }
                "content_type" => {
                    check_column(&schema.table, column, "TEXT")?;
                    seen |= CONTENT_TYPE_SEEN;
                }
                _ => {}
            }
        }

        if seen & ALL_SEEN != ALL_SEEN {
            return Err(ConformanceError::MissingRequiredColumns {
                table: schema.table.clone(),
            });
        }

        Ok(())
    }
}

impl RuleSet for MediaRules {
    fn class(&self) -> ConformanceClass {
        ConformanceClass::Media
    }

    fn validate_table(&self, conn: &dyn ContainerConnection, table: &str) -> Result<(), CheckError> {
        let schema = existing_table_schema(conn, table)?;
        Ok(self.check_schema(&schema)?)
    }
}

/// Type, not-null, default and key flag of a required media column, in that order
fn check_column(table: &str, column: &ColumnDescriptor, declared_type: &str) -> Result<(), ConformanceError> {
    let fail = |test: &str, expected: &str, actual: String| ConformanceError::InvalidColumnProperty {
        table: table.to_string(),
        property: format!("{} {}", column.name, test),
        expected: expected.to_string(),
        actual,
    };

    if column.declared_type != declared_type {
        return Err(fail("type", declared_type, column.declared_type.clone()));
    }

    if !column.not_null {
        return Err(fail("notnull", "1", "0".to_string()));
    }

    if let Some(default_value) = &column.default_value {
        return Err(fail("default value", "null", default_value.clone()));
    }

    if column.is_primary_key {
        return Err(fail("primary key", "0", "1".to_string()));
    }

    Ok(())
}
