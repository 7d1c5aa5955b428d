//! Report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of conformance classes evaluated
    pub classes_checked: usize,

    /// Classes that passed
    pub passed: usize,

    /// Classes skipped as not in use
    pub skipped: usize,

    /// Classes that failed
    pub failed: usize,

    /// Related tables validated across all classes
    pub tables_validated: usize,
}

/// The container a report was produced for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Path as given on the command line
    pub path: String,

    /// Hex SHA-256 of the file contents
    pub sha256: String,
}

impl ContainerInfo {
    /// Fingerprint a container from its bytes
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            sha256: hex::encode(Sha256::digest(bytes)),
        }
    }

    /// Fingerprint a container file on disk
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(path.display().to_string(), &bytes))
    }
}

/// Check report (report.json v1)
///
/// This is the stable output format.
/// All fields are versioned and backward-compatible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Checked container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerInfo>,

    /// Summary statistics
    pub summary: ReportSummary,

    /// One diagnostic per evaluated class
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            container: None,
            summary: ReportSummary::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Attach container information
    pub fn with_container(mut self, container: ContainerInfo) -> Self {
        self.container = Some(container);
        self
    }

    /// Add a class outcome diagnostic to the report
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match (diagnostic.severity, diagnostic.code) {
            (Severity::Error, _) => self.summary.failed += 1,
            (Severity::Info, DiagnosticCode::ClassPassed) => self.summary.passed += 1,
            (Severity::Info, _) => self.summary.skipped += 1,
        }

        self.summary.classes_checked += 1;
        self.diagnostics.push(diagnostic);
    }

    /// Count related tables validated
    pub fn add_tables_validated(&mut self, count: usize) {
        self.summary.tables_validated += count;
    }

    /// Check if the report has any failures
    pub fn has_errors(&self) -> bool {
        self.summary.failed > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance::ConformanceClass;

    #[test]
    fn empty_report() {
        let report = Report::new();
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.classes_checked, 0);
        assert!(!report.has_errors());
    }

    #[test]
    fn report_counts_outcomes() {
        let mut report = Report::new();
        report.add_diagnostic(Diagnostic::new(
            DiagnosticCode::ClassPassed,
            Severity::Info,
            ConformanceClass::Media,
            "passed",
        ));
        report.add_diagnostic(Diagnostic::new(
            DiagnosticCode::ConformanceClassNotApplicable,
            Severity::Info,
            ConformanceClass::Features,
            "not in use",
        ));
        report.add_diagnostic(Diagnostic::new(
            DiagnosticCode::NoPrimaryKey,
            Severity::Error,
            ConformanceClass::SimpleAttributes,
            "no pk",
        ));

        assert_eq!(report.summary.classes_checked, 3);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.failed, 1);
        assert!(report.has_errors());
    }

    #[test]
    fn container_fingerprint() {
        let info = ContainerInfo::from_bytes("empty.gpkg", b"");
        assert_eq!(
            info.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn report_serialization() {
        let report = Report::new().with_container(ContainerInfo::from_bytes("a.gpkg", b"x"));
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"diagnostics\""));
        assert!(json.contains("\"sha256\""));
    }
}
