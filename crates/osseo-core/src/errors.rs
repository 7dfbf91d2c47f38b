//! Cross-cutting error types for Osseo.
//!
//! This module defines errors that can originate from any crate in the system.
//! Storage errors (`DatabaseError`) and job errors (`JobError`) are defined in
//! their respective crates and convert from `CoreError` where needed.

use thiserror::Error;

/// Errors that can be raised by any Osseo crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Input failed validation (unknown tag, empty identifier, bad format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
