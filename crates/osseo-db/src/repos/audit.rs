//! Audit log repository.
//!
//! Append-only entries recording state changes and record views. Entries are
//! written either on their own ([`ClinicService::record_audit`]) or inside the
//! transaction of the mutation they describe ([`ClinicService::record_audit_in`]).
//! History is read newest first and decorated with the actor's display name.

use chrono::{DateTime, Utc};

use osseo_core::entities::{AuditEntry, NewAuditEntry};
use osseo_core::enums::{AuditAction, EntityType};
use osseo_core::ids::PREFIX_AUDIT;
use osseo_core::responses::{AuditEntryView, AuditPage};

use crate::error::DatabaseError;
use crate::{AUDIT_ID_BYTES, generate_id_sized};
use crate::helpers::{
    format_datetime, get_opt_string, now, parse_datetime, parse_enum, parse_optional_json,
};
use crate::service::ClinicService;

const SELECT_VIEW_COLS: &str = "a.id, a.entity_type, a.entity_id, a.action, a.details, a.metadata, \
     a.actor_user_id, a.created_at, u.display_name";

/// Filter criteria for cross-entity audit listings.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub actor_user_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

fn row_to_view(row: &libsql::Row) -> Result<AuditEntryView, DatabaseError> {
    let entry = AuditEntry {
        id: row.get::<String>(0)?,
        entity_type: parse_enum(&row.get::<String>(1)?)?,
        entity_id: row.get::<String>(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        details: get_opt_string(row, 4)?,
        metadata: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        actor_user_id: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    };
    Ok(AuditEntryView::new(entry, get_opt_string(row, 8)?))
}

/// Validate and insert one audit row on `conn`, which may be a transaction.
pub(crate) async fn insert_audit(
    conn: &libsql::Connection,
    entry: &NewAuditEntry,
    actor_user_id: Option<&str>,
) -> Result<AuditEntry, DatabaseError> {
    entry.validate()?;
    let id = generate_id_sized(conn, PREFIX_AUDIT, AUDIT_ID_BYTES).await?;
    let now = now();
    let metadata = entry
        .metadata
        .as_ref()
        .map(serde_json::Value::to_string);

    conn.execute(
        "INSERT INTO audit_log (id, entity_type, entity_id, action, details, metadata, actor_user_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        libsql::params![
            id.as_str(),
            entry.entity_type.as_str(),
            entry.entity_id.as_str(),
            entry.action.as_str(),
            entry.details.as_deref(),
            metadata.as_deref(),
            actor_user_id,
            format_datetime(&now)
        ],
    )
    .await?;

    Ok(AuditEntry {
        id,
        entity_type: entry.entity_type,
        entity_id: entry.entity_id.clone(),
        action: entry.action,
        details: entry.details.clone(),
        metadata: entry.metadata.clone(),
        actor_user_id: actor_user_id.map(String::from),
        created_at: now,
    })
}

impl ClinicService {
    /// Append an audit entry attributed to this service's actor.
    ///
    /// The entry is visible to [`Self::query_audit`] as soon as this returns.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if `entity_id` is blank (nothing is
    /// written), or a storage error if the INSERT fails.
    pub async fn record_audit(&self, entry: NewAuditEntry) -> Result<AuditEntry, DatabaseError> {
        let _guard = self.db().write_lock().await;
        let recorded = insert_audit(self.db().conn(), &entry, self.actor_id()).await?;
        tracing::debug!(
            entity_type = %recorded.entity_type,
            entity_id = %recorded.entity_id,
            action = %recorded.action,
            "audit entry recorded"
        );
        Ok(recorded)
    }

    /// Append an audit entry from untyped tags (HTTP path segments, CLI args).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for an unknown entity type or
    /// action, or a blank entity id; nothing is written in that case.
    pub async fn record_audit_raw(
        &self,
        entity_type: &str,
        entity_id: &str,
        action: &str,
        details: Option<&str>,
        metadata: Option<serde_json::Value>,
    ) -> Result<AuditEntry, DatabaseError> {
        let mut entry = NewAuditEntry::from_raw(entity_type, entity_id, action)?;
        entry.details = details.map(String::from);
        entry.metadata = metadata;
        self.record_audit(entry).await
    }

    /// Append an audit entry on a caller-owned transaction.
    ///
    /// The entry commits or rolls back together with the caller's business
    /// write. The caller is responsible for holding the write lock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if validation or the INSERT fails.
    pub async fn record_audit_in(
        &self,
        conn: &libsql::Connection,
        entry: &NewAuditEntry,
    ) -> Result<AuditEntry, DatabaseError> {
        insert_audit(conn, entry, self.actor_id()).await
    }

    /// History of one record, newest first.
    ///
    /// `limit` defaults to the service's configured page size. The returned
    /// page also reports how many older entries were left out. The count and
    /// the page are read under one guard, so they always agree and never
    /// include rows from an uncommitted transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a stored row is malformed.
    pub async fn query_audit(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        limit: Option<u32>,
    ) -> Result<AuditPage, DatabaseError> {
        let limit = limit.unwrap_or_else(|| self.default_audit_limit());
        let _guard = self.db().read_guard().await;

        let mut count_rows = self
            .db()
            .query_with(
                "SELECT COUNT(*) FROM audit_log WHERE entity_type = ?1 AND entity_id = ?2",
                || libsql::params![entity_type.as_str(), entity_id],
            )
            .await?;
        let total = match count_rows.next().await? {
            Some(row) => u64::try_from(row.get::<i64>(0)?).unwrap_or(0),
            None => 0,
        };
        if total == 0 {
            return Ok(AuditPage::empty());
        }

        let sql = format!(
            "SELECT {SELECT_VIEW_COLS}
             FROM audit_log a
             LEFT JOIN users u ON u.id = a.actor_user_id
             WHERE a.entity_type = ?1 AND a.entity_id = ?2
             ORDER BY a.created_at DESC, a.rowid DESC
             LIMIT ?3"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || {
                libsql::params![entity_type.as_str(), entity_id, i64::from(limit)]
            })
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_view(&row)?);
        }

        Ok(AuditPage::new(entries, total))
    }

    /// [`Self::query_audit`] for the `GET /audit/{entityType}/{entityId}` shape.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for an unknown entity type or blank id.
    pub async fn query_audit_raw(
        &self,
        entity_type: &str,
        entity_id: &str,
        limit: Option<u32>,
    ) -> Result<AuditPage, DatabaseError> {
        let entity_type: EntityType = entity_type.parse()?;
        if entity_id.trim().is_empty() {
            return Err(DatabaseError::Validation("entity_id must not be empty".into()));
        }
        self.query_audit(entity_type, entity_id, limit).await
    }

    /// Cross-entity listing with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_audit(
        &self,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditEntryView>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("a.entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("a.entity_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("a.action = ?{}", params.len()));
        }
        if let Some(ref actor) = filter.actor_user_id {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("a.actor_user_id = ?{}", params.len()));
        }
        if let Some(ref since) = filter.since {
            params.push(libsql::Value::Text(format_datetime(since)));
            conditions.push(format!("a.created_at >= ?{}", params.len()));
        }
        if let Some(ref until) = filter.until {
            params.push(libsql::Value::Text(format_datetime(until)));
            conditions.push(format!("a.created_at < ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or_else(|| self.default_audit_limit());
        let _guard = self.db().read_guard().await;
        let sql = format!(
            "SELECT {SELECT_VIEW_COLS}
             FROM audit_log a
             LEFT JOIN users u ON u.id = a.actor_user_id
             {where_clause}
             ORDER BY a.created_at DESC, a.rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_view(&row)?);
        }

        Ok(entries)
    }
}
