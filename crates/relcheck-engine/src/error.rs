//! Errors surfaced by conformance checks

use relcheck_catalog::CatalogError;
use relcheck_core::ConformanceError;

/// Either a structural violation or a failure to read the container
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckError {
    /// The container does not conform (or does not use the class)
    #[error(transparent)]
    Conformance(#[from] ConformanceError),

    /// The container could not be read
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl CheckError {
    /// The conformance failure, if this is one
    pub fn as_conformance(&self) -> Option<&ConformanceError> {
        match self {
            Self::Conformance(e) => Some(e),
            Self::Catalog(_) => None,
        }
    }
}
