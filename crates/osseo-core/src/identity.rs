use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The authenticated user a service instance acts on behalf of.
///
/// Resolved by the request layer and handed to `osseo-db`. Background jobs
/// run without an actor, which the audit log records as a system action.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Actor {
    /// User ID (`usr-...`) recorded as `actor_user_id` on audit entries.
    pub user_id: String,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
