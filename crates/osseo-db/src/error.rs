//! Database error types for osseo-db.

use osseo_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
///
/// `Validation` is the caller's fault and nothing was written. Every other
/// variant is a storage failure and must reach the caller's mutation flow.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Input rejected before touching the database.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., disallowed status transition).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether the error was caused by invalid input rather than storage.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<CoreError> for DatabaseError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::InvalidTransition { .. } => Self::InvalidState(error.to_string()),
            CoreError::NotFound { .. } => Self::NoResult,
            CoreError::Other(e) => Self::Other(e),
        }
    }
}
