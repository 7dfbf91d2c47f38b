//! Typed audit metadata payloads.
//!
//! Each audit entry can carry a structured `metadata` JSON blob. These types
//! describe the shapes written by the service itself.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata for an `UPDATE` that moved a record between statuses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Metadata for an `UPDATE` applied from an external calendar.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CalendarSyncedDetail {
    pub provider: String,
    pub external_id: String,
    pub date_start: String,
    pub date_end: String,
    pub cancelled: bool,
}
