//! Appointment repository: create, read, cancel, bulk auto-completion, and
//! application of external calendar changes.
//!
//! Every mutation writes its audit entry in the same transaction as the
//! business write.

use chrono::{DateTime, Utc};

use osseo_core::audit_detail::{CalendarSyncedDetail, StatusChangedDetail};
use osseo_core::entities::{Appointment, NewAuditEntry};
use osseo_core::enums::{AppointmentStatus, AuditAction, EntityType};
use osseo_core::errors::CoreError;
use osseo_core::ids::PREFIX_APPOINTMENT;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, now, parse_datetime, parse_enum};
use crate::repos::audit::insert_audit;
use crate::service::ClinicService;
use crate::{finish_tx, generate_id};

const SELECT_COLS: &str =
    "id, patient_id, title, date_start, date_end, status, created_at, updated_at";

/// Reason recorded when the scheduler completes an appointment.
pub const AUTO_COMPLETE_REASON: &str = "auto_complete";

fn row_to_appointment(row: &libsql::Row) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        title: row.get(2)?,
        date_start: parse_datetime(&row.get::<String>(3)?)?,
        date_end: parse_datetime(&row.get::<String>(4)?)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

async fn fetch_appointment(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Appointment, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM appointments WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_appointment(&row)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(value).map_err(|e| DatabaseError::Other(e.into()))
}

/// A change to a linked appointment reported by an external calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarChange {
    pub provider: String,
    pub external_id: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub cancelled: bool,
}

impl ClinicService {
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a blank patient/title or an
    /// end time not after the start time.
    pub async fn create_appointment(
        &self,
        patient_id: &str,
        title: &str,
        date_start: DateTime<Utc>,
        date_end: DateTime<Utc>,
    ) -> Result<Appointment, DatabaseError> {
        if patient_id.trim().is_empty() || title.trim().is_empty() {
            return Err(DatabaseError::Validation(
                "patient_id and title must not be empty".into(),
            ));
        }
        if date_end <= date_start {
            return Err(DatabaseError::Validation(
                "date_end must be after date_start".into(),
            ));
        }

        let _guard = self.db().write_lock().await;
        let tx = self.db().conn().transaction().await?;
        let result = async {
            let now = now();
            let id = generate_id(&tx, PREFIX_APPOINTMENT).await?;
            tx.execute(
                &format!(
                    "INSERT INTO appointments ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                libsql::params![
                    id.as_str(),
                    patient_id,
                    title,
                    format_datetime(&date_start),
                    format_datetime(&date_end),
                    AppointmentStatus::Upcoming.as_str(),
                    format_datetime(&now),
                    format_datetime(&now)
                ],
            )
            .await?;

            let appointment = fetch_appointment(&tx, &id).await?;
            insert_audit(
                &tx,
                &NewAuditEntry::new(EntityType::Appointment, id.as_str(), AuditAction::Create)
                    .with_details(format!("Appointment '{title}' scheduled"))
                    .with_metadata(to_json(&appointment)?),
                self.actor_id(),
            )
            .await?;
            Ok(appointment)
        }
        .await;
        finish_tx(tx, result).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no appointment has this ID.
    pub async fn get_appointment(&self, id: &str) -> Result<Appointment, DatabaseError> {
        let _guard = self.db().read_guard().await;
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM appointments WHERE id = ?1"),
                || [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_appointment(&row)
    }

    /// List appointments by start time, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
        limit: u32,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let _guard = self.db().read_guard().await;
        let mut rows = match status {
            Some(status) => {
                self.db()
                    .query_with(
                        &format!(
                            "SELECT {SELECT_COLS} FROM appointments WHERE status = ?1
                             ORDER BY date_start LIMIT ?2"
                        ),
                        || libsql::params![status.as_str(), i64::from(limit)],
                    )
                    .await?
            }
            None => {
                self.db()
                    .query_with(
                        &format!(
                            "SELECT {SELECT_COLS} FROM appointments ORDER BY date_start LIMIT ?1"
                        ),
                        || [i64::from(limit)],
                    )
                    .await?
            }
        };
        let mut appointments = Vec::new();
        while let Some(row) = rows.next().await? {
            appointments.push(row_to_appointment(&row)?);
        }
        Ok(appointments)
    }

    /// Cancel an upcoming appointment.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the appointment is no longer
    /// upcoming; nothing is written in that case.
    pub async fn cancel_appointment(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<Appointment, DatabaseError> {
        let _guard = self.db().write_lock().await;
        let tx = self.db().conn().transaction().await?;
        let result = async {
            let current = fetch_appointment(&tx, id).await?;
            let next = AppointmentStatus::Cancelled;
            if !current.status.can_transition_to(next) {
                return Err(CoreError::InvalidTransition {
                    entity_type: EntityType::Appointment.to_string(),
                    id: id.to_string(),
                    from: current.status.to_string(),
                    to: next.to_string(),
                }
                .into());
            }

            let now = now();
            tx.execute(
                "UPDATE appointments SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![next.as_str(), format_datetime(&now), id],
            )
            .await?;

            let detail = StatusChangedDetail {
                from: current.status.as_str().to_string(),
                to: next.as_str().to_string(),
                reason: reason.map(String::from),
            };
            insert_audit(
                &tx,
                &NewAuditEntry::new(EntityType::Appointment, id, AuditAction::Update)
                    .with_details("Appointment cancelled")
                    .with_metadata(to_json(&detail)?),
                self.actor_id(),
            )
            .await?;
            fetch_appointment(&tx, id).await
        }
        .await;
        finish_tx(tx, result).await
    }

    /// Mark every upcoming appointment that ended strictly before `now` as completed.
    ///
    /// The status change is one conditional `UPDATE ... RETURNING`, so rows
    /// modified concurrently are either completed here or not at all. Each
    /// completed appointment gets a system-attributed audit entry in the same
    /// transaction. Returns the IDs of the completed appointments.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the update or an audit insert fails; the
    /// whole batch is rolled back in that case.
    pub async fn complete_past_due_appointments(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, DatabaseError> {
        let _guard = self.db().write_lock().await;
        let tx = self.db().conn().transaction().await?;
        let result = async {
            let cutoff = format_datetime(&now);
            let mut rows = tx
                .query(
                    "UPDATE appointments SET status = ?1, updated_at = ?2
                     WHERE status = ?3 AND date_end < ?2
                     RETURNING id",
                    libsql::params![
                        AppointmentStatus::Completed.as_str(),
                        cutoff.as_str(),
                        AppointmentStatus::Upcoming.as_str()
                    ],
                )
                .await?;
            let mut ids = Vec::new();
            while let Some(row) = rows.next().await? {
                ids.push(row.get::<String>(0)?);
            }
            drop(rows);
            ids.sort();

            let detail = to_json(&StatusChangedDetail {
                from: AppointmentStatus::Upcoming.as_str().to_string(),
                to: AppointmentStatus::Completed.as_str().to_string(),
                reason: Some(AUTO_COMPLETE_REASON.to_string()),
            })?;
            for id in &ids {
                insert_audit(
                    &tx,
                    &NewAuditEntry::new(EntityType::Appointment, id.as_str(), AuditAction::Update)
                        .with_details("Appointment completed automatically")
                        .with_metadata(detail.clone()),
                    None,
                )
                .await?;
            }
            Ok(ids)
        }
        .await;
        finish_tx(tx, result).await
    }

    /// Apply an external calendar change to the appointment linked to it.
    ///
    /// Returns `Ok(None)` if no local appointment is linked to the event, and
    /// `Ok(Some(appointment))` with the resulting state otherwise. Changes to
    /// appointments that are no longer upcoming only refresh the link's sync
    /// timestamp. The audit entry is attributed to the system.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if the event ends before it starts,
    /// or a storage error if any statement fails. Nothing is written in either
    /// case.
    pub async fn apply_calendar_change(
        &self,
        change: &CalendarChange,
    ) -> Result<Option<Appointment>, DatabaseError> {
        if change.date_end <= change.date_start {
            return Err(DatabaseError::Validation(format!(
                "{} event {}: date_end must be after date_start",
                change.provider, change.external_id
            )));
        }
        let _guard = self.db().write_lock().await;
        let tx = self.db().conn().transaction().await?;
        let result = async {
            let Some(link) =
                crate::repos::external_link::find_link_on(&tx, &change.provider, &change.external_id)
                    .await?
            else {
                return Ok(None);
            };

            let current = fetch_appointment(&tx, &link.appointment_id).await?;
            let now = now();
            let new_status = if change.cancelled {
                AppointmentStatus::Cancelled
            } else {
                current.status
            };
            let times_changed =
                current.date_start != change.date_start || current.date_end != change.date_end;
            let status_changed = new_status != current.status;

            if current.status == AppointmentStatus::Upcoming && (times_changed || status_changed) {
                tx.execute(
                    "UPDATE appointments SET date_start = ?1, date_end = ?2, status = ?3, updated_at = ?4
                     WHERE id = ?5",
                    libsql::params![
                        format_datetime(&change.date_start),
                        format_datetime(&change.date_end),
                        new_status.as_str(),
                        format_datetime(&now),
                        current.id.as_str()
                    ],
                )
                .await?;

                let detail = CalendarSyncedDetail {
                    provider: change.provider.clone(),
                    external_id: change.external_id.clone(),
                    date_start: format_datetime(&change.date_start),
                    date_end: format_datetime(&change.date_end),
                    cancelled: change.cancelled,
                };
                insert_audit(
                    &tx,
                    &NewAuditEntry::new(
                        EntityType::Appointment,
                        current.id.as_str(),
                        AuditAction::Update,
                    )
                    .with_details(format!("Synchronized from {}", change.provider))
                    .with_metadata(to_json(&detail)?),
                    None,
                )
                .await?;
            }

            tx.execute(
                "UPDATE appointment_external_links SET last_synced_at = ?1
                 WHERE provider = ?2 AND external_id = ?3",
                libsql::params![
                    format_datetime(&now),
                    change.provider.as_str(),
                    change.external_id.as_str()
                ],
            )
            .await?;

            fetch_appointment(&tx, &current.id).await.map(Some)
        }
        .await;
        finish_tx(tx, result).await
    }
}
