//! User repository.
//!
//! Only what audit history needs: users exist so that `actor_user_id` can be
//! resolved to a display name.

use osseo_core::entities::User;
use osseo_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, now, parse_datetime};
use crate::service::ClinicService;

impl ClinicService {
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a blank name, or a storage error.
    pub async fn create_user(&self, display_name: &str) -> Result<User, DatabaseError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(DatabaseError::Validation("display_name must not be empty".into()));
        }
        let _guard = self.db().write_lock().await;
        let id = self.db().generate_id(PREFIX_USER).await?;
        let now = now();
        self.db()
            .execute_with(
                "INSERT INTO users (id, display_name, created_at) VALUES (?1, ?2, ?3)",
                || libsql::params![id.as_str(), display_name, format_datetime(&now)],
            )
            .await?;
        Ok(User {
            id,
            display_name: display_name.to_string(),
            created_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no user has this ID.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let _guard = self.db().read_guard().await;
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, display_name, created_at FROM users WHERE id = ?1",
                || [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(User {
            id: row.get(0)?,
            display_name: row.get(1)?,
            created_at: parse_datetime(&row.get::<String>(2)?)?,
        })
    }
}
