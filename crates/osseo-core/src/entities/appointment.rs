use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AppointmentStatus;

/// A scheduled patient appointment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub title: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
