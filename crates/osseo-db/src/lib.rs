//! # osseo-db
//!
//! libSQL storage for the Osseo audit log and the records touched by
//! background jobs: users, appointments, and external calendar links.
//!
//! Uses the `libsql` crate (C `SQLite` fork) as an embedded database. The
//! service layer ([`service::ClinicService`]) hosts all repository methods.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;
use retry::{RetryConfig, with_retry};
use tokio::sync::{Mutex, MutexGuard};

/// Central database handle for all Osseo state operations.
///
/// Wraps a libSQL database and a single connection. Every write takes
/// [`ClinicDb::write_lock`] first, so a statement from one task never lands
/// inside another task's open transaction on the shared connection. Reads
/// take [`ClinicDb::read_guard`], the same lock, so they never observe rows
/// an open transaction has not committed yet.
pub struct ClinicDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    write_lock: Mutex<()>,
    retry: RetryConfig,
}

impl ClinicDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let clinic_db = Self {
            db,
            conn,
            write_lock: Mutex::new(()),
            retry: RetryConfig::default(),
        };
        clinic_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(clinic_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Serialize multi-statement writes on the shared connection.
    pub async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Exclude open transactions for the duration of a read.
    ///
    /// Hold the guard until the last row has been stepped: libSQL rows are
    /// read lazily from the connection.
    pub async fn read_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Execute a single statement, retrying transient lock errors.
    ///
    /// `params` is called once per attempt because libSQL consumes parameters.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the statement fails.
    pub async fn execute_with<P, F>(&self, sql: &str, params: F) -> Result<u64, DatabaseError>
    where
        P: IntoParams,
        F: Fn() -> P,
    {
        let conn = &self.conn;
        Ok(with_retry(&self.retry, || conn.execute(sql, params())).await?)
    }

    /// Run a single query, retrying transient lock errors.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_with<P, F>(&self, sql: &str, params: F) -> Result<libsql::Rows, DatabaseError>
    where
        P: IntoParams,
        F: Fn() -> P,
    {
        let conn = &self.conn;
        Ok(with_retry(&self.retry, || conn.query(sql, params())).await?)
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"usr-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        generate_id(&self.conn, prefix).await
    }
}

/// Random bytes behind ordinary record IDs.
pub const ID_BYTES: u32 = 4;

/// Random bytes behind audit IDs, which must stay unique across the
/// lifetime of the append-only log.
pub const AUDIT_ID_BYTES: u32 = 16;

/// Generate a prefixed ID on an arbitrary connection (including a transaction).
///
/// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
pub(crate) async fn generate_id(
    conn: &libsql::Connection,
    prefix: &str,
) -> Result<String, DatabaseError> {
    generate_id_sized(conn, prefix, ID_BYTES).await
}

/// [`generate_id`] with `bytes` random bytes (`2 * bytes` hex chars).
pub(crate) async fn generate_id_sized(
    conn: &libsql::Connection,
    prefix: &str,
    bytes: u32,
) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT ?1 || '-' || lower(hex(randomblob(?2)))",
            libsql::params![prefix, i64::from(bytes)],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}

/// Commit `tx` if `result` is `Ok`, roll it back otherwise.
pub(crate) async fn finish_tx<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = tx.rollback().await {
                tracing::warn!(%rollback_error, %error, "transaction rollback failed");
            }
            Err(error)
        }
    }
}
