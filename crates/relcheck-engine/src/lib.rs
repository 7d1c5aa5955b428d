//! relcheck engine - Conformance rule engine
//!
//! This crate implements the Related Tables conformance checks:
//! - Applicability of each conformance class
//! - Primary key detection
//! - Media, Simple Attributes and Related Features rule sets
//! - GeoPackage feature table and geometry validation

pub mod error;
pub mod primary_key;
pub mod applicability;
pub mod rules;
pub mod geometry;
pub mod feature_validator;
pub mod checker;

pub use error::CheckError;
pub use primary_key::primary_key_column;
pub use applicability::{Applicability, NotApplicableReason};
pub use rules::{rule_set_for, FeaturesRules, MediaRules, RuleSet, SimpleAttributesRules};
pub use geometry::{check_geometry, GeometryDefect, GeometryHeader};
pub use feature_validator::{FeatureTableValidator, GeoPackageFeatureValidator};
pub use checker::{ClassOutcome, ConformanceChecker};
