//! Marks upcoming appointments whose end time has passed as completed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use osseo_db::service::ClinicService;

use crate::error::JobError;
use crate::scheduler::JobConfig;

pub const JOB_NAME: &str = "appointment-auto-complete";

/// Complete every past-due appointment and return their IDs.
///
/// # Errors
///
/// Returns `JobError::Database` if the update fails; no appointment is
/// changed in that case.
pub async fn complete_past_due(service: &ClinicService) -> Result<Vec<String>, JobError> {
    let ids = service.complete_past_due_appointments(Utc::now()).await?;
    if ids.is_empty() {
        tracing::debug!(job = JOB_NAME, "no past-due appointments");
    } else {
        tracing::info!(job = JOB_NAME, count = ids.len(), ids = ?ids, "appointments auto-completed");
    }
    Ok(ids)
}

#[must_use]
pub fn job(service: Arc<ClinicService>, interval: Duration) -> JobConfig {
    JobConfig::new(JOB_NAME, interval, move || {
        let service = Arc::clone(&service);
        async move { complete_past_due(&service).await.map(|_| ()) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use chrono::Duration as ChronoDuration;
    use osseo_core::enums::AppointmentStatus;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn completes_only_past_due() {
        let service = Arc::new(ClinicService::new_local(":memory:", None).await.unwrap());
        let now = Utc::now();
        let past = service
            .create_appointment(
                "pat-1",
                "Implant placement",
                now - ChronoDuration::hours(3),
                now - ChronoDuration::hours(2),
            )
            .await
            .unwrap();
        let future = service
            .create_appointment(
                "pat-1",
                "Follow-up",
                now + ChronoDuration::days(7),
                now + ChronoDuration::days(7) + ChronoDuration::minutes(30),
            )
            .await
            .unwrap();

        let ids = complete_past_due(&service).await.unwrap();
        assert_eq!(ids, vec![past.id.clone()]);
        assert_eq!(
            service.get_appointment(&future.id).await.unwrap().status,
            AppointmentStatus::Upcoming
        );
    }

    #[tokio::test]
    async fn runs_through_scheduler() {
        let service = Arc::new(ClinicService::new_local(":memory:", None).await.unwrap());
        let now = Utc::now();
        let past = service
            .create_appointment(
                "pat-1",
                "Suture removal",
                now - ChronoDuration::hours(2),
                now - ChronoDuration::hours(1),
            )
            .await
            .unwrap();

        let config = job(Arc::clone(&service), Duration::from_secs(60));
        assert_eq!(config.name, JOB_NAME);
        Scheduler::new().run_once(&config).await.unwrap();
        assert_eq!(
            service.get_appointment(&past.id).await.unwrap().status,
            AppointmentStatus::Completed
        );
    }
}
