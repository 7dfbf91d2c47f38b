//! ID prefixes for generated identifiers.
//!
//! IDs are produced by the database layer as `{prefix}-{8 hex chars}`.

pub const PREFIX_AUDIT: &str = "aud";
pub const PREFIX_APPOINTMENT: &str = "apt";
pub const PREFIX_USER: &str = "usr";
