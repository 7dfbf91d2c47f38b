//! Audit history configuration.

use serde::{Deserialize, Serialize};

/// Default page size for history queries.
const fn default_limit() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Page size used when a history query does not specify a limit.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}
