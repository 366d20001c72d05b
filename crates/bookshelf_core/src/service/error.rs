//! Domain error taxonomy shared by registries and the work catalog.

use crate::repo::StoreError;
use log::error;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Outcome of a rejected registry or catalog operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Caller-supplied value failed a precondition.
    #[error("{0}")]
    Validation(String),
    /// Referenced record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Delete blocked by records that still reference the target.
    #[error("{0}")]
    Integrity(String),
    /// Persistence failure with no domain meaning.
    #[error("storage failure: {0}")]
    Store(#[source] StoreError),
}

impl CatalogError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Short stable code for log events and CLI exit handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Integrity(_) => "integrity",
            Self::Store(_) => "store",
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        error!("event=store_failure module=service status=error error={value}");
        Self::Store(value)
    }
}
