//! Read models and command responses.
//!
//! These structs define the JSON shape served to history consumers
//! (`GET /audit/{entityType}/{entityId}`) and printed by `osseo` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::AuditEntry;
use crate::enums::ActionCategory;

/// Label used when an entry has no actor or the actor no longer resolves.
pub const UNKNOWN_USER_LABEL: &str = "Unknown user";

/// An audit entry decorated for display.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditEntryView {
    #[serde(flatten)]
    pub entry: AuditEntry,
    pub actor_display_name: String,
    pub action_label: String,
    pub action_category: ActionCategory,
}

impl AuditEntryView {
    /// Decorate an entry with its resolved actor name.
    ///
    /// `None` (no actor, or a dangling reference) falls back to
    /// [`UNKNOWN_USER_LABEL`].
    #[must_use]
    pub fn new(entry: AuditEntry, actor_display_name: Option<String>) -> Self {
        let action = entry.action;
        Self {
            entry,
            actor_display_name: actor_display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_USER_LABEL.to_string()),
            action_label: action.label().to_string(),
            action_category: action.category(),
        }
    }
}

/// One page of history for a single record, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditPage {
    pub entries: Vec<AuditEntryView>,
    /// Number of entries stored for the record, regardless of `limit`.
    pub total: u64,
    /// Entries not included in this page.
    pub remaining: u64,
    pub has_more: bool,
}

impl AuditPage {
    #[must_use]
    pub fn new(entries: Vec<AuditEntryView>, total: u64) -> Self {
        let remaining = total.saturating_sub(entries.len() as u64);
        Self {
            entries,
            total,
            remaining,
            has_more: remaining > 0,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

/// Response from `osseo job list`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct JobSummary {
    pub name: String,
    pub interval_secs: u64,
    pub enabled: bool,
}

/// Response from `osseo job run`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct JobRunResponse {
    pub name: String,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::enums::{AuditAction, EntityType};

    fn entry() -> AuditEntry {
        AuditEntry {
            id: "aud-00000001".to_string(),
            entity_type: EntityType::Patient,
            entity_id: "p1".to_string(),
            action: AuditAction::Archive,
            details: None,
            metadata: None,
            actor_user_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn view_falls_back_to_unknown_user() {
        let view = AuditEntryView::new(entry(), None);
        assert_eq!(view.actor_display_name, UNKNOWN_USER_LABEL);
        assert_eq!(view.action_label, "Archived");
        assert_eq!(view.action_category, ActionCategory::Cautionary);

        let blank = AuditEntryView::new(entry(), Some(String::new()));
        assert_eq!(blank.actor_display_name, UNKNOWN_USER_LABEL);
    }

    #[test]
    fn view_serializes_flat() {
        let view = AuditEntryView::new(entry(), Some("Dr. Hale".to_string()));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["entity_type"], "PATIENT");
        assert_eq!(json["actor_display_name"], "Dr. Hale");
    }

    #[test]
    fn page_reports_remaining() {
        let page = AuditPage::new(
            vec![AuditEntryView::new(entry(), None), AuditEntryView::new(entry(), None)],
            5,
        );
        assert_eq!(page.remaining, 3);
        assert!(page.has_more);

        let empty = AuditPage::empty();
        assert_eq!(empty.remaining, 0);
        assert!(!empty.has_more);
    }
}
