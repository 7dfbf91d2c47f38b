//! Pulls appointment changes from an external calendar.
//!
//! Each run fetches the events changed since the last successful run, applies
//! them to the linked local appointments, and then advances the cursor.
//! Events with no local link are skipped. A failed run leaves the cursor
//! where it was, so the next run retries the same window.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use osseo_db::repos::appointment::CalendarChange;
use osseo_db::service::ClinicService;
use tokio::sync::Mutex;

use crate::error::JobError;
use crate::scheduler::JobConfig;

pub const JOB_NAME: &str = "calendar-sync";

/// An external calendar that reports changed events.
pub trait CalendarSource: Send + Sync {
    /// Provider tag stored on appointment links (e.g. `"google"`).
    fn provider(&self) -> &str;

    /// Events changed since `since`, or all known events when `None`.
    fn fetch_changes(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> BoxFuture<'_, Result<Vec<CalendarChange>, JobError>>;
}

/// Source used when no calendar provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCalendarSource;

impl CalendarSource for NoopCalendarSource {
    fn provider(&self) -> &str {
        "none"
    }

    fn fetch_changes(
        &self,
        _since: Option<DateTime<Utc>>,
    ) -> BoxFuture<'_, Result<Vec<CalendarChange>, JobError>> {
        async { Ok(Vec::new()) }.boxed()
    }
}

/// Outcome of one sync run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub fetched: usize,
    pub applied: usize,
    pub skipped: usize,
}

pub struct CalendarSync {
    service: Arc<ClinicService>,
    source: Arc<dyn CalendarSource>,
    cursor: Mutex<Option<DateTime<Utc>>>,
    fetch_timeout: Duration,
}

impl CalendarSync {
    #[must_use]
    pub fn new(
        service: Arc<ClinicService>,
        source: Arc<dyn CalendarSource>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            service,
            source,
            cursor: Mutex::new(None),
            fetch_timeout,
        }
    }

    /// Time of the last successful run.
    pub async fn cursor(&self) -> Option<DateTime<Utc>> {
        *self.cursor.lock().await
    }

    /// Fetch and apply one batch of remote changes.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Timeout` if the remote fetch exceeds the fetch
    /// timeout, `JobError::Remote` if the source fails, or
    /// `JobError::Database` if applying a change fails.
    pub async fn run(&self) -> Result<SyncReport, JobError> {
        let mut cursor = self.cursor.lock().await;
        let started = Utc::now();

        let changes = tokio::time::timeout(self.fetch_timeout, self.source.fetch_changes(*cursor))
            .await
            .map_err(|_| JobError::Timeout(self.fetch_timeout))??;

        let mut report = SyncReport {
            fetched: changes.len(),
            ..SyncReport::default()
        };
        for change in &changes {
            match self.service.apply_calendar_change(change).await {
                Ok(Some(_)) => report.applied += 1,
                Ok(None) => {
                    report.skipped += 1;
                    tracing::debug!(
                        job = JOB_NAME,
                        provider = %change.provider,
                        external_id = %change.external_id,
                        "no linked appointment, skipping event"
                    );
                }
                Err(error) if error.is_validation() => {
                    report.skipped += 1;
                    tracing::warn!(
                        job = JOB_NAME,
                        provider = %change.provider,
                        external_id = %change.external_id,
                        %error,
                        "invalid event, skipping"
                    );
                }
                Err(error) => return Err(error.into()),
            }
        }

        *cursor = Some(started);
        tracing::info!(
            job = JOB_NAME,
            provider = self.source.provider(),
            fetched = report.fetched,
            applied = report.applied,
            skipped = report.skipped,
            "calendar sync finished"
        );
        Ok(report)
    }
}

/// Build the job. The remote fetch is bounded by `interval`.
#[must_use]
pub fn job(
    service: Arc<ClinicService>,
    source: Arc<dyn CalendarSource>,
    interval: Duration,
) -> JobConfig {
    let sync = Arc::new(CalendarSync::new(service, source, interval));
    JobConfig::new(JOB_NAME, interval, move || {
        let sync = Arc::clone(&sync);
        async move { sync.run().await.map(|_| ()) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use osseo_core::enums::AppointmentStatus;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex as StdMutex;

    /// Replays a fixed batch and records the cursors it was asked for.
    struct FakeSource {
        changes: Vec<CalendarChange>,
        fail: bool,
        delay: Option<Duration>,
        seen: StdMutex<Vec<Option<DateTime<Utc>>>>,
    }

    impl FakeSource {
        fn new(changes: Vec<CalendarChange>) -> Self {
            Self {
                changes,
                fail: false,
                delay: None,
                seen: StdMutex::new(Vec::new()),
            }
        }
    }

    impl CalendarSource for FakeSource {
        fn provider(&self) -> &str {
            "fake"
        }

        fn fetch_changes(
            &self,
            since: Option<DateTime<Utc>>,
        ) -> BoxFuture<'_, Result<Vec<CalendarChange>, JobError>> {
            self.seen.lock().unwrap().push(since);
            async move {
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                if self.fail {
                    return Err(JobError::Remote("calendar unavailable".into()));
                }
                Ok(self.changes.clone())
            }
            .boxed()
        }
    }

    fn change(external_id: &str, start: DateTime<Utc>, cancelled: bool) -> CalendarChange {
        CalendarChange {
            provider: "fake".into(),
            external_id: external_id.into(),
            date_start: start,
            date_end: start + ChronoDuration::hours(1),
            cancelled,
        }
    }

    async fn service() -> Arc<ClinicService> {
        Arc::new(ClinicService::new_local(":memory:", None).await.unwrap())
    }

    #[tokio::test]
    async fn applies_linked_and_skips_unlinked() {
        let service = service().await;
        let start = osseo_db::helpers::now() + ChronoDuration::days(3);
        let appt = service
            .create_appointment("pat-1", "Bone graft review", start, start + ChronoDuration::hours(1))
            .await
            .unwrap();
        service.link_appointment(&appt.id, "fake", "evt-1").await.unwrap();

        let moved = start + ChronoDuration::days(1);
        let source = Arc::new(FakeSource::new(vec![
            change("evt-1", moved, false),
            change("evt-orphan", moved, false),
        ]));
        let sync = CalendarSync::new(Arc::clone(&service), source.clone(), Duration::from_secs(5));

        let report = sync.run().await.unwrap();
        assert_eq!(
            report,
            SyncReport {
                fetched: 2,
                applied: 1,
                skipped: 1
            }
        );
        assert_eq!(service.get_appointment(&appt.id).await.unwrap().date_start, moved);

        let first_cursor = sync.cursor().await;
        assert!(first_cursor.is_some());
        sync.run().await.unwrap();
        assert_eq!(source.seen.lock().unwrap()[1], first_cursor);
    }

    #[tokio::test]
    async fn inverted_event_is_skipped_and_rest_applied() {
        let service = service().await;
        let start = osseo_db::helpers::now() + ChronoDuration::days(3);
        let bad = service
            .create_appointment("pat-1", "Implant placement", start, start + ChronoDuration::hours(2))
            .await
            .unwrap();
        let good = service
            .create_appointment("pat-2", "Suture removal", start, start + ChronoDuration::hours(1))
            .await
            .unwrap();
        service.link_appointment(&bad.id, "fake", "evt-bad").await.unwrap();
        service.link_appointment(&good.id, "fake", "evt-good").await.unwrap();

        let moved = start + ChronoDuration::days(1);
        let mut inverted = change("evt-bad", moved, false);
        inverted.date_end = moved - ChronoDuration::hours(1);
        let source = Arc::new(FakeSource::new(vec![inverted, change("evt-good", moved, false)]));
        let sync = CalendarSync::new(Arc::clone(&service), source, Duration::from_secs(5));

        let report = sync.run().await.unwrap();
        assert_eq!(
            report,
            SyncReport {
                fetched: 2,
                applied: 1,
                skipped: 1
            }
        );
        assert_eq!(service.get_appointment(&bad.id).await.unwrap(), bad);
        assert_eq!(service.get_appointment(&good.id).await.unwrap().date_start, moved);
        assert!(sync.cursor().await.is_some());
    }

    #[tokio::test]
    async fn remote_cancellation_cancels_appointment() {
        let service = service().await;
        let start = osseo_db::helpers::now() + ChronoDuration::days(3);
        let appt = service
            .create_appointment("pat-1", "Consult", start, start + ChronoDuration::hours(1))
            .await
            .unwrap();
        service.link_appointment(&appt.id, "fake", "evt-1").await.unwrap();

        let source = Arc::new(FakeSource::new(vec![change("evt-1", start, true)]));
        CalendarSync::new(Arc::clone(&service), source, Duration::from_secs(5))
            .run()
            .await
            .unwrap();
        assert_eq!(
            service.get_appointment(&appt.id).await.unwrap().status,
            AppointmentStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn failed_fetch_keeps_cursor() {
        let service = service().await;
        let mut source = FakeSource::new(Vec::new());
        source.fail = true;
        let sync = CalendarSync::new(service, Arc::new(source), Duration::from_secs(5));

        let err = sync.run().await.unwrap_err();
        assert!(matches!(err, JobError::Remote(_)));
        assert_eq!(sync.cursor().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out() {
        let service = service().await;
        let mut source = FakeSource::new(Vec::new());
        source.delay = Some(Duration::from_secs(600));
        let sync = CalendarSync::new(service, Arc::new(source), Duration::from_secs(300));

        let err = sync.run().await.unwrap_err();
        assert!(matches!(err, JobError::Timeout(d) if d == Duration::from_secs(300)));
        assert_eq!(sync.cursor().await, None);
    }

    #[tokio::test]
    async fn noop_source_reports_nothing() {
        let sync = CalendarSync::new(
            service().await,
            Arc::new(NoopCalendarSource),
            Duration::from_secs(5),
        );
        assert_eq!(sync.run().await.unwrap(), SyncReport::default());
    }
}
