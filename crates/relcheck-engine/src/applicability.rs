//! Conformance class applicability
//!
//! A class is in use when the extension registry and relations catalog both
//! exist and the relations catalog names at least one related table for the
//! class. Checks run in that order; the first failing one is the reason.

use crate::rules::RuleSet;
use relcheck_catalog::{CatalogError, ContainerConnection, RelationsCatalog, SchemaCatalog};
use serde::Serialize;
use std::fmt;

/// Why a class is not in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotApplicableReason {
    /// A required catalog table is missing
    MissingCatalogTable { table: &'static str },

    /// The relations catalog has no rows for the class's relation name
    NoRelations { relation_name: &'static str },
}

impl fmt::Display for NotApplicableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCatalogTable { table } => write!(f, "table {} does not exist", table),
            Self::NoRelations { relation_name } => {
                write!(f, "no relations with relation_name '{}'", relation_name)
            }
        }
    }
}

/// Outcome of the applicability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    /// Class is in use; related tables in catalog order
    Applicable { tables: Vec<String> },

    NotApplicable { reason: NotApplicableReason },
}

impl Applicability {
    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Applicable { .. })
    }
}

/// Decide whether a rule set's class is in use in the container
pub fn evaluate(
    conn: &dyn ContainerConnection,
    rules: &dyn RuleSet,
) -> Result<Applicability, CatalogError> {
    let schema = SchemaCatalog::new(conn);

    for &table in rules.required_catalog_tables() {
        if !schema.table_exists(table)? {
            tracing::debug!(class = %rules.class(), table, "catalog table missing");
            return Ok(Applicability::NotApplicable {
                reason: NotApplicableReason::MissingCatalogTable { table },
            });
        }
    }

    let relation_name = rules.relation_filter();
    let tables = RelationsCatalog::new(conn).related_tables(relation_name)?;
    if tables.is_empty() {
        return Ok(Applicability::NotApplicable {
            reason: NotApplicableReason::NoRelations { relation_name },
        });
    }

    Ok(Applicability::Applicable { tables })
}
