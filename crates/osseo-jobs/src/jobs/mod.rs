//! Built-in maintenance jobs.

pub mod appointment_auto_complete;
pub mod calendar_sync;

use std::sync::Arc;

use osseo_config::JobsConfig;
use osseo_core::responses::JobSummary;
use osseo_db::service::ClinicService;

use crate::scheduler::JobConfig;
use calendar_sync::CalendarSource;

/// A built-in job and whether configuration enables it.
#[derive(Debug, Clone)]
pub struct BuiltinJob {
    pub config: JobConfig,
    pub enabled: bool,
}

impl BuiltinJob {
    #[must_use]
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            name: self.config.name.clone(),
            interval_secs: self.config.interval.as_secs(),
            enabled: self.enabled,
        }
    }
}

/// Assemble every built-in job from configuration, enabled or not.
#[must_use]
pub fn builtin_jobs(
    service: &Arc<ClinicService>,
    config: &JobsConfig,
    calendar: Arc<dyn CalendarSource>,
) -> Vec<BuiltinJob> {
    let auto_complete = config.auto_complete();
    let calendar_sync = config.calendar_sync();
    vec![
        BuiltinJob {
            config: appointment_auto_complete::job(Arc::clone(service), auto_complete.interval()),
            enabled: auto_complete.enabled,
        },
        BuiltinJob {
            config: calendar_sync::job(Arc::clone(service), calendar, calendar_sync.interval()),
            enabled: calendar_sync.enabled,
        },
    ]
}
