//! Entity types, audit actions, and status enums for Osseo.
//!
//! All enums serialize as `SCREAMING_SNAKE_CASE`, which is also the form
//! stored in SQL and accepted on the wire (`GET /audit/PATIENT/{id}`).
//! Parsing from strings via `FromStr` is case-insensitive and rejects
//! anything outside the closed set with `CoreError::Validation`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Kind of domain record an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Patient,
    Operation,
    Implant,
    Document,
    Radio,
    Appointment,
    Visit,
    Prosthesis,
}

impl EntityType {
    pub const ALL: [Self; 8] = [
        Self::Patient,
        Self::Operation,
        Self::Implant,
        Self::Document,
        Self::Radio,
        Self::Appointment,
        Self::Visit,
        Self::Prosthesis,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "PATIENT",
            Self::Operation => "OPERATION",
            Self::Implant => "IMPLANT",
            Self::Document => "DOCUMENT",
            Self::Radio => "RADIO",
            Self::Appointment => "APPOINTMENT",
            Self::Visit => "VISIT",
            Self::Prosthesis => "PROSTHESIS",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| CoreError::Validation(format!("unknown entity type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Kind of event recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    View,
    Archive,
    Restore,
}

impl AuditAction {
    pub const ALL: [Self; 6] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::View,
        Self::Archive,
        Self::Restore,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::View => "VIEW",
            Self::Archive => "ARCHIVE",
            Self::Restore => "RESTORE",
        }
    }

    /// Human-readable label shown in history timelines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "Created",
            Self::Update => "Updated",
            Self::Delete => "Deleted",
            Self::View => "Viewed",
            Self::Archive => "Archived",
            Self::Restore => "Restored",
        }
    }

    /// Visual category used to pick icon and colour.
    #[must_use]
    pub const fn category(self) -> ActionCategory {
        match self {
            Self::Create | Self::Restore => ActionCategory::Positive,
            Self::Update => ActionCategory::Informational,
            Self::Delete => ActionCategory::Destructive,
            Self::View => ActionCategory::Neutral,
            Self::Archive => ActionCategory::Cautionary,
        }
    }

    /// Whether the action changes the audited record.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        !matches!(self, Self::View)
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == upper)
            .ok_or_else(|| CoreError::Validation(format!("unknown audit action '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// ActionCategory
// ---------------------------------------------------------------------------

/// Display category of an audit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Positive,
    Informational,
    Destructive,
    Neutral,
    Cautionary,
}

impl ActionCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Informational => "informational",
            Self::Destructive => "destructive",
            Self::Neutral => "neutral",
            Self::Cautionary => "cautionary",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AppointmentStatus
// ---------------------------------------------------------------------------

/// Status of an appointment.
///
/// ```text
/// upcoming → completed
///          → cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [Self; 3] = [Self::Upcoming, Self::Completed, Self::Cancelled];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Upcoming => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| CoreError::Validation(format!("unknown appointment status '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
