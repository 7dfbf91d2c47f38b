use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, EntityType};
use crate::errors::CoreError;

/// An append-only audit log entry recording an event on a domain record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: AuditAction,
    pub details: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub actor_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied part of an audit entry.
///
/// The ID, timestamp, and actor are filled in by the service at write time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: AuditAction,
    pub details: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl NewAuditEntry {
    #[must_use]
    pub fn new(entity_type: EntityType, entity_id: impl Into<String>, action: AuditAction) -> Self {
        Self {
            entity_type,
            entity_id: entity_id.into(),
            action,
            details: None,
            metadata: None,
        }
    }

    /// Build an entry from untyped tags, as received from an HTTP path or CLI.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if either tag is outside its closed set
    /// or `entity_id` is blank.
    pub fn from_raw(entity_type: &str, entity_id: &str, action: &str) -> Result<Self, CoreError> {
        let entry = Self::new(entity_type.parse()?, entity_id, action.parse()?);
        entry.validate()?;
        Ok(entry)
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `entity_id` is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.entity_id.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "entity_id must not be empty (entity_type {})",
                self.entity_type
            )));
        }
        Ok(())
    }
}
