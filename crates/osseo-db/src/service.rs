//! Service layer orchestrating database mutations with the audit log.
//!
//! `ClinicService` wraps `ClinicDb` (raw database access) and the acting
//! user. All repo methods are implemented as `impl ClinicService`.

use osseo_core::identity::Actor;

use crate::ClinicDb;
use crate::error::DatabaseError;

/// Page size used when no history limit is requested.
pub const DEFAULT_AUDIT_LIMIT: u32 = 50;

/// Orchestrates database mutations together with their audit entries.
///
/// Every audited mutation method follows this protocol:
/// 1. Take the write lock
/// 2. Begin transaction
/// 3. Execute SQL
/// 4. Append audit entry (inside transaction)
/// 5. Commit, or roll back both on any failure
pub struct ClinicService {
    db: ClinicDb,
    actor: Option<Actor>,
    default_audit_limit: u32,
}

impl ClinicService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    /// * `actor` — The authenticated user, or `None` for system/background work.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, actor: Option<Actor>) -> Result<Self, DatabaseError> {
        let db = ClinicDb::open_local(db_path).await?;
        Ok(Self::from_db(db, actor))
    }

    /// Create from an existing `ClinicDb`.
    #[must_use]
    pub fn from_db(db: ClinicDb, actor: Option<Actor>) -> Self {
        Self {
            db,
            actor,
            default_audit_limit: DEFAULT_AUDIT_LIMIT,
        }
    }

    /// Act on behalf of a different user (or as the system with `None`).
    #[must_use]
    pub fn with_actor(mut self, actor: Option<Actor>) -> Self {
        self.actor = actor;
        self
    }

    /// Override the page size used by history queries without a limit.
    #[must_use]
    pub fn with_default_audit_limit(mut self, limit: u32) -> Self {
        self.default_audit_limit = limit;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ClinicDb {
        &self.db
    }

    /// The user this service acts for, if any.
    #[must_use]
    pub const fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub(crate) fn actor_id(&self) -> Option<&str> {
        self.actor.as_ref().map(|a| a.user_id.as_str())
    }

    #[must_use]
    pub const fn default_audit_limit(&self) -> u32 {
        self.default_audit_limit
    }
}
