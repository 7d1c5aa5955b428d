//! Conformance checker
//!
//! Entry point per conformance class. Applicability is evaluated first and is
//! an explicit step: [`ConformanceChecker::applicability`] answers the
//! question on its own, [`ConformanceChecker::validate`] surfaces "not in use"
//! as an error, and [`ConformanceChecker::run`] lets the caller decide whether
//! that error is a skip or a failure.

use crate::applicability::{self, Applicability};
use crate::error::CheckError;
use crate::feature_validator::{FeatureTableValidator, GeoPackageFeatureValidator};
use crate::rules::{rule_set_for, RuleSet};
use relcheck_catalog::{CatalogError, ContainerConnection};
use relcheck_core::{
    ConformanceClass, ConformanceError, Diagnostic, DiagnosticCode, NotApplicablePolicy, Severity,
};

/// Result of running one conformance class
#[derive(Debug, Clone, PartialEq)]
pub enum ClassOutcome {
    /// Every related table conforms
    Passed { tables: Vec<String> },

    /// The class is not in use and the policy allows skipping it
    Skipped { error: ConformanceError },

    /// First violation found
    Failed { error: ConformanceError },
}

impl ClassOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Number of related tables validated (zero unless passed)
    pub fn tables_validated(&self) -> usize {
        match self {
            Self::Passed { tables } => tables.len(),
            _ => 0,
        }
    }

    /// Render as a report diagnostic
    pub fn to_diagnostic(&self, class: ConformanceClass) -> Diagnostic {
        match self {
            Self::Passed { tables } => Diagnostic::new(
                DiagnosticCode::ClassPassed,
                Severity::Info,
                class,
                format!(
                    "{} passed ({} related table{})",
                    class.display_name(),
                    tables.len(),
                    if tables.len() == 1 { "" } else { "s" }
                ),
            ),
            Self::Skipped { error } => {
                Diagnostic::new(DiagnosticCode::ClassSkipped, Severity::Info, class, error.to_string())
            }
            Self::Failed { error } => Diagnostic::from_error(class, Severity::Error, error),
        }
    }
}

/// Runs conformance classes against one open container
pub struct ConformanceChecker<'c> {
    conn: &'c dyn ContainerConnection,
    feature_validator: Box<dyn FeatureTableValidator + 'c>,
    check_geometry_values: bool,
}

impl<'c> ConformanceChecker<'c> {
    /// Create a checker using the GeoPackage feature table validator
    pub fn new(conn: &'c dyn ContainerConnection) -> Self {
        Self {
            conn,
            feature_validator: Box::new(GeoPackageFeatureValidator),
            check_geometry_values: true,
        }
    }

    /// Replace the feature table validator
    pub fn with_feature_validator(mut self, validator: Box<dyn FeatureTableValidator + 'c>) -> Self {
        self.feature_validator = validator;
        self
    }

    /// Enable or disable the per-row geometry check for feature tables
    pub fn with_geometry_values(mut self, enabled: bool) -> Self {
        self.check_geometry_values = enabled;
        self
    }

    fn rules(&self, class: ConformanceClass) -> Box<dyn RuleSet + '_> {
        rule_set_for(class, self.feature_validator.as_ref(), self.check_geometry_values)
    }

    /// Whether the class is in use, and its related tables if so
    pub fn applicability(&self, class: ConformanceClass) -> Result<Applicability, CatalogError> {
        applicability::evaluate(self.conn, self.rules(class).as_ref())
    }

    pub fn is_applicable(&self, class: ConformanceClass) -> Result<bool, CatalogError> {
        Ok(self.applicability(class)?.is_applicable())
    }

    /// Check a class, failing with `ConformanceClassNotApplicable` when it is not in use
    pub fn validate(&self, class: ConformanceClass) -> Result<(), CheckError> {
        self.check(class).map(|_| ())
    }

    fn check(&self, class: ConformanceClass) -> Result<Vec<String>, CheckError> {
        let rules = self.rules(class);

        let tables = match applicability::evaluate(self.conn, rules.as_ref())? {
            Applicability::Applicable { tables } => tables,
            Applicability::NotApplicable { reason } => {
                tracing::warn!(class = %class, %reason, "conformance class not in use");
                return Err(ConformanceError::ConformanceClassNotApplicable { class }.into());
            }
        };

        rules.validate_tables(self.conn, &tables)?;
        Ok(tables)
    }

    /// Check a class and classify the result
    ///
    /// Container read failures are returned as errors; they are not
    /// conformance outcomes.
    pub fn run(
        &self,
        class: ConformanceClass,
        policy: NotApplicablePolicy,
    ) -> Result<ClassOutcome, CatalogError> {
        let outcome = match self.check(class) {
            Ok(tables) => ClassOutcome::Passed { tables },
            Err(CheckError::Catalog(e)) => return Err(e),
            Err(CheckError::Conformance(error)) if error.is_not_applicable() => match policy {
                NotApplicablePolicy::Skip => ClassOutcome::Skipped { error },
                NotApplicablePolicy::Fail => ClassOutcome::Failed { error },
            },
            Err(CheckError::Conformance(error)) => ClassOutcome::Failed { error },
        };

        match &outcome {
            ClassOutcome::Passed { tables } => {
                tracing::info!(class = %class, tables = tables.len(), "conformance class passed")
            }
            ClassOutcome::Skipped { .. } => tracing::info!(class = %class, "conformance class skipped"),
            ClassOutcome::Failed { error } => {
                tracing::info!(class = %class, code = error.code().as_str(), "conformance class failed")
            }
        }

        Ok(outcome)
    }

    /// Run several classes in order
    pub fn run_all(
        &self,
        classes: &[ConformanceClass],
        policy: NotApplicablePolicy,
    ) -> Result<Vec<(ConformanceClass, ClassOutcome)>, CatalogError> {
        classes
            .iter()
            .map(|&class| Ok((class, self.run(class, policy)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relcheck_catalog::MockContainer;
    use relcheck_core::{ColumnDescriptor, TableSchema, EXTENSIONS_TABLE};

    fn media_container(data_type: &str) -> MockContainer {
        MockContainer::new()
            .with_related_tables_extension()
            .with_relation("media", "sample_media")
            .with_table(TableSchema::new(
                "sample_media",
                vec![
                    ColumnDescriptor::new("id", "INTEGER").with_primary_key(true),
                    ColumnDescriptor::new("data", data_type).with_not_null(true),
                    ColumnDescriptor::new("content_type", "TEXT").with_not_null(true),
                ],
            ))
    }

    #[test]
    fn valid_media_class_passes() {
        let container = media_container("BLOB");
        let checker = ConformanceChecker::new(&container);

        assert!(checker.is_applicable(ConformanceClass::Media).unwrap());
        assert_eq!(checker.validate(ConformanceClass::Media), Ok(()));
        assert_eq!(
            checker.run(ConformanceClass::Media, NotApplicablePolicy::Skip).unwrap(),
            ClassOutcome::Passed { tables: vec!["sample_media".to_string()] }
        );
    }

    #[test]
    fn not_applicable_surfaces_from_validate() {
        let container = media_container("BLOB");
        let checker = ConformanceChecker::new(&container);

        let err = checker.validate(ConformanceClass::SimpleAttributes).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conformance class Related Tables Extension Simple Attributes Conformance Class is not in use."
        );
    }

    #[test]
    fn policy_decides_skip_or_fail() {
        let container = MockContainer::new();
        let checker = ConformanceChecker::new(&container);

        let skipped = checker.run(ConformanceClass::Features, NotApplicablePolicy::Skip).unwrap();
        assert!(matches!(skipped, ClassOutcome::Skipped { .. }));
        assert!(!skipped.is_failure());

        let failed = checker.run(ConformanceClass::Features, NotApplicablePolicy::Fail).unwrap();
        assert!(failed.is_failure());
        assert_eq!(
            failed.to_diagnostic(ConformanceClass::Features).code,
            DiagnosticCode::ConformanceClassNotApplicable
        );
    }

    #[test]
    fn violation_becomes_failed_outcome() {
        let container = media_container("TEXT");
        let checker = ConformanceChecker::new(&container);

        let outcome = checker.run(ConformanceClass::Media, NotApplicablePolicy::Skip).unwrap();
        let diagnostic = outcome.to_diagnostic(ConformanceClass::Media);

        assert_eq!(diagnostic.code, DiagnosticCode::InvalidColumnProperty);
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(
            diagnostic.message,
            "The media table sample_media failed test data type. expected [BLOB] but found [TEXT]"
        );
        assert_eq!(diagnostic.expected.as_deref(), Some("BLOB"));
        assert_eq!(diagnostic.actual.as_deref(), Some("TEXT"));
        assert_eq!(outcome.tables_validated(), 0);
    }

    #[test]
    fn catalog_failure_is_not_an_outcome() {
        let container = MockContainer::new()
            .with_error_for_table(EXTENSIONS_TABLE, CatalogError::Open("gone".to_string()));
        let checker = ConformanceChecker::new(&container);

        assert_eq!(
            checker.run(ConformanceClass::Media, NotApplicablePolicy::Skip),
            Err(CatalogError::Open("gone".to_string()))
        );
    }

    #[test]
    fn run_all_keeps_class_order() {
        let container = media_container("BLOB");
        let checker = ConformanceChecker::new(&container);

        let outcomes = checker.run_all(&ConformanceClass::ALL, NotApplicablePolicy::Skip).unwrap();
        let classes: Vec<_> = outcomes.iter().map(|(class, _)| *class).collect();
        assert_eq!(classes, ConformanceClass::ALL.to_vec());
        assert!(matches!(outcomes[1].1, ClassOutcome::Passed { .. }));
        assert!(matches!(outcomes[0].1, ClassOutcome::Skipped { .. }));
    }

    #[test]
    fn injected_feature_validator_is_used() {
        struct RejectAll;
        impl FeatureTableValidator for RejectAll {
            fn validate_integer_primary_key(&self, _: &dyn ContainerConnection, tables: &[String]) -> Result<(), CheckError> {
                Err(ConformanceError::NoIntegerPrimaryKey { table: tables[0].clone() }.into())
            }
            fn validate_geometry_column_type(&self, _: &dyn ContainerConnection, _: &[String]) -> Result<(), CheckError> {
                Ok(())
            }
            fn validate_single_geometry_column(&self, _: &dyn ContainerConnection, _: &[String]) -> Result<(), CheckError> {
                Ok(())
            }
            fn validate_geometry_values(&self, _: &dyn ContainerConnection, _: &str, _: &str) -> Result<(), CheckError> {
                Ok(())
            }
        }

        let container = MockContainer::new()
            .with_related_tables_extension()
            .with_relation("features", "roads");
        let checker = ConformanceChecker::new(&container).with_feature_validator(Box::new(RejectAll));

        assert_eq!(
            checker.validate(ConformanceClass::Features),
            Err(CheckError::Conformance(ConformanceError::NoIntegerPrimaryKey {
                table: "roads".to_string()
            }))
        );
    }
}
