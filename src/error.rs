//! Error taxonomy shared by the catalog, the stores and the sync engine.
//!
//! Only failures of the record that initiated an operation surface through
//! these variants. Sibling failures during fan-out are logged and collected
//! into a [`crate::sync::SyncReport`] instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Record, event or template absent
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed date, unknown type or language, missing field
    #[error("{0}")]
    ValidationFailed(String),

    /// Upstream catalog fetch failed or returned a non-success status
    #[error("catalog unavailable for language '{language}': {reason}")]
    CatalogUnavailable { language: String, reason: String },

    /// No catalog node with this id exists in the language's tree
    #[error("source not found: {source_id} ({language})")]
    SourceNotFound { source_id: String, language: String },

    /// Store read/write error
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    /// A subset of sibling writes failed during propagation
    #[error("{} of {attempted} sibling writes failed", .failed.len())]
    PartialPropagationFailure {
        attempted: usize,
        failed: Vec<String>,
    },
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Error::ValidationFailed(reason.into())
    }

    /// Stable machine-readable code used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) | Error::SourceNotFound { .. } => "NOT_FOUND",
            Error::ValidationFailed(_) => "VALIDATION_FAILED",
            Error::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            Error::PersistenceFailed(_) => "PERSISTENCE_FAILED",
            Error::PartialPropagationFailure { .. } => "PARTIAL_PROPAGATION_FAILURE",
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::PersistenceFailed(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::PersistenceFailed(format!("document encoding: {}", err))
    }
}
