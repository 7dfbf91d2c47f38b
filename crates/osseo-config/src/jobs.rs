//! Background job configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Period of the appointment auto-completion job.
pub const AUTO_COMPLETE_INTERVAL_SECS: u64 = 60;

/// Period of the external calendar sync job.
pub const CALENDAR_SYNC_INTERVAL_SECS: u64 = 5 * 60;

const fn enabled() -> bool {
    true
}

const fn default_auto_complete_interval() -> u64 {
    AUTO_COMPLETE_INTERVAL_SECS
}

const fn default_calendar_sync_interval() -> u64 {
    CALENDAR_SYNC_INTERVAL_SECS
}

/// Schedule settings for one periodic job.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct JobSchedule {
    #[serde(default = "enabled")]
    pub enabled: bool,
    pub interval_secs: u64,
}

impl JobSchedule {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutoCompleteSchedule {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default = "default_auto_complete_interval")]
    pub interval_secs: u64,
}

impl Default for AutoCompleteSchedule {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: AUTO_COMPLETE_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalendarSyncSchedule {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default = "default_calendar_sync_interval")]
    pub interval_secs: u64,
}

impl Default for CalendarSyncSchedule {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: CALENDAR_SYNC_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobsConfig {
    #[serde(default)]
    pub appointment_auto_complete: AutoCompleteSchedule,
    #[serde(default)]
    pub calendar_sync: CalendarSyncSchedule,
}

impl JobsConfig {
    #[must_use]
    pub const fn auto_complete(&self) -> JobSchedule {
        JobSchedule {
            enabled: self.appointment_auto_complete.enabled,
            interval_secs: self.appointment_auto_complete.interval_secs,
        }
    }

    #[must_use]
    pub const fn calendar_sync(&self) -> JobSchedule {
        JobSchedule {
            enabled: self.calendar_sync.enabled,
            interval_secs: self.calendar_sync.interval_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_intervals() {
        let config = JobsConfig::default();
        assert_eq!(config.auto_complete().interval(), Duration::from_secs(60));
        assert_eq!(config.calendar_sync().interval(), Duration::from_secs(300));
        assert!(config.auto_complete().enabled);
        assert!(config.calendar_sync().enabled);
    }
}
