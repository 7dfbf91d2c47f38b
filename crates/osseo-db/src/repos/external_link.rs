//! Mapping between local appointments and external calendar events.

use osseo_core::entities::AppointmentExternalLink;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, now, parse_optional_datetime};
use crate::service::ClinicService;

const SELECT_COLS: &str = "appointment_id, provider, external_id, last_synced_at";

fn row_to_link(row: &libsql::Row) -> Result<AppointmentExternalLink, DatabaseError> {
    Ok(AppointmentExternalLink {
        appointment_id: row.get(0)?,
        provider: row.get(1)?,
        external_id: row.get(2)?,
        last_synced_at: parse_optional_datetime(row.get::<Option<String>>(3)?.as_deref())?,
    })
}

/// Look up a link on an arbitrary connection (including a transaction).
pub(crate) async fn find_link_on(
    conn: &libsql::Connection,
    provider: &str,
    external_id: &str,
) -> Result<Option<AppointmentExternalLink>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM appointment_external_links
                 WHERE provider = ?1 AND external_id = ?2"
            ),
            [provider, external_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_link(&row)?)),
        None => Ok(None),
    }
}

impl ClinicService {
    /// Link an appointment to an external calendar event.
    ///
    /// Re-linking the same `(provider, external_id)` points it at the new
    /// appointment.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a blank provider or external ID,
    /// or a storage error if the appointment does not exist.
    pub async fn link_appointment(
        &self,
        appointment_id: &str,
        provider: &str,
        external_id: &str,
    ) -> Result<AppointmentExternalLink, DatabaseError> {
        if provider.trim().is_empty() || external_id.trim().is_empty() {
            return Err(DatabaseError::Validation(
                "provider and external_id must not be empty".into(),
            ));
        }
        let _guard = self.db().write_lock().await;
        self.db()
            .execute_with(
                "INSERT INTO appointment_external_links (appointment_id, provider, external_id, last_synced_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (provider, external_id) DO UPDATE SET appointment_id = excluded.appointment_id",
                || {
                    libsql::params![
                        appointment_id,
                        provider,
                        external_id,
                        format_datetime(&now())
                    ]
                },
            )
            .await?;
        find_link_on(self.db().conn(), provider, external_id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_link(
        &self,
        provider: &str,
        external_id: &str,
    ) -> Result<Option<AppointmentExternalLink>, DatabaseError> {
        let _guard = self.db().read_guard().await;
        find_link_on(self.db().conn(), provider, external_id).await
    }

    /// All external links for one appointment.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn links_for_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Vec<AppointmentExternalLink>, DatabaseError> {
        let _guard = self.db().read_guard().await;
        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {SELECT_COLS} FROM appointment_external_links
                     WHERE appointment_id = ?1 ORDER BY provider, external_id"
                ),
                || [appointment_id],
            )
            .await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(row_to_link(&row)?);
        }
        Ok(links)
    }
}
