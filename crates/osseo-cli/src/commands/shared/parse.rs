use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Parse a case-insensitive enum tag (`patient`, `UPDATE`, ...).
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a JSON argument.
pub fn parse_json(raw: &str, field: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).map_err(|error| anyhow::anyhow!("invalid {field} JSON: {error}"))
}
