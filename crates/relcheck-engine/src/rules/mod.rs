//! Per-class rule sets
//!
//! Each conformance class shares one evaluation shape: resolve the related
//! tables through the relations catalog, then validate each table in turn,
//! stopping at the first violation.

pub mod media;
pub mod simple_attributes;
pub mod features;

pub use media::MediaRules;
pub use simple_attributes::SimpleAttributesRules;
pub use features::FeaturesRules;

use crate::error::CheckError;
use crate::feature_validator::FeatureTableValidator;
use relcheck_catalog::{ContainerConnection, SchemaCatalog};
use relcheck_core::{ConformanceClass, ConformanceError, TableSchema};

/// Rules a conformance class applies to its related tables
pub trait RuleSet {
    /// Class the rules belong to
    fn class(&self) -> ConformanceClass;

    /// Catalog tables that must exist for the class to be in use
    fn required_catalog_tables(&self) -> &'static [&'static str] {
        self.class().required_catalog_tables()
    }

    /// `relation_name` value selecting this class's related tables
    fn relation_filter(&self) -> &'static str {
        self.class().relation_name()
    }

    /// Validate a single related table
    fn validate_table(&self, conn: &dyn ContainerConnection, table: &str) -> Result<(), CheckError>;

    /// Validate every related table, fail-fast in the given order
    fn validate_tables(&self, conn: &dyn ContainerConnection, tables: &[String]) -> Result<(), CheckError> {
        for table in tables {
            tracing::debug!(class = %self.class(), table = %table, "validating related table");
            self.validate_table(conn, table)?;
        }
        Ok(())
    }
}

/// Build the rule set for a class
pub fn rule_set_for<'v>(
    class: ConformanceClass,
    feature_validator: &'v dyn FeatureTableValidator,
    check_geometry_values: bool,
) -> Box<dyn RuleSet + 'v> {
    match class {
        ConformanceClass::Features => Box::new(
            FeaturesRules::new(feature_validator).with_geometry_values(check_geometry_values),
        ),
        ConformanceClass::Media => Box::new(MediaRules),
        ConformanceClass::SimpleAttributes => Box::new(SimpleAttributesRules),
    }
}

/// Column metadata of a table that must exist
pub(crate) fn existing_table_schema(
    conn: &dyn ContainerConnection,
    table: &str,
) -> Result<TableSchema, CheckError> {
    let catalog = SchemaCatalog::new(conn);

    if !catalog.table_exists(table)? {
        return Err(ConformanceError::TableNotFound {
            table: table.to_string(),
        }
        .into());
    }

    let schema = catalog.columns(table)?;
    if schema.is_absent() {
        return Err(ConformanceError::TableNotFound {
            table: table.to_string(),
        }
        .into());
    }

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_validator::GeoPackageFeatureValidator;
    use relcheck_catalog::MockContainer;
    use relcheck_core::{ColumnDescriptor, RELATIONS_TABLE};

    #[test]
    fn rule_sets_expose_class_metadata() {
        let validator = GeoPackageFeatureValidator;
        for class in ConformanceClass::ALL {
            let rules = rule_set_for(class, &validator, true);
            assert_eq!(rules.class(), class);
            assert_eq!(rules.relation_filter(), class.relation_name());
            assert!(rules.required_catalog_tables().contains(&RELATIONS_TABLE));
        }
    }

    #[test]
    fn absent_table_is_distinct_failure() {
        let container = MockContainer::new();
        assert_eq!(
            existing_table_schema(&container, "ghost"),
            Err(CheckError::Conformance(ConformanceError::TableNotFound {
                table: "ghost".to_string()
            }))
        );
    }

    #[test]
    fn existing_table_schema_reads_columns() {
        let container = MockContainer::new().with_table(TableSchema::new(
            "info",
            vec![ColumnDescriptor::new("id", "INTEGER").with_primary_key(true)],
        ));
        assert_eq!(existing_table_schema(&container, "info").unwrap().columns.len(), 1);
    }
}
