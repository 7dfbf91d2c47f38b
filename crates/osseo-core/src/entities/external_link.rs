use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mapping between a local appointment and an event in an external calendar.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AppointmentExternalLink {
    pub appointment_id: String,
    pub provider: String,
    pub external_id: String,
    pub last_synced_at: Option<DateTime<Utc>>,
}
