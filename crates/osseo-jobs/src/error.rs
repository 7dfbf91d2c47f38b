//! Job error types for osseo-jobs.

use std::time::Duration;

use osseo_db::error::DatabaseError;
use thiserror::Error;

/// Errors returned by job handlers and the scheduler.
#[derive(Debug, Error)]
pub enum JobError {
    /// Rejected at registration; the job was not armed.
    #[error("Invalid job config: {0}")]
    InvalidConfig(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// An external system (calendar provider) failed.
    #[error("Remote source failed: {0}")]
    Remote(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The handler task panicked. Only produced for scheduled ticks.
    #[error("Job handler panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
