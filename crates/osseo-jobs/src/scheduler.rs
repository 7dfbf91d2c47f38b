//! Periodic job scheduler.
//!
//! Each registered job gets one timer task that fires every `interval`,
//! starting one interval after registration. A tick spawns the handler as
//! its own task and waits for it before arming the next firing, so ticks of
//! one job never overlap; firings missed while a tick runs are skipped.
//!
//! Stopping a job aborts its timer task only. A handler that is already
//! running is detached and runs to completion.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::JobError;

/// Zero-argument async unit of work run on every tick.
pub type JobHandler = Arc<dyn Fn() -> BoxFuture<'static, Result<(), JobError>> + Send + Sync>;

/// A named periodic job.
#[derive(Clone)]
pub struct JobConfig {
    pub name: String,
    pub interval: Duration,
    pub handler: JobHandler,
}

impl JobConfig {
    pub fn new<F, Fut>(name: impl Into<String>, interval: Duration, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), JobError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            interval,
            handler: Arc::new(move || handler().boxed()),
        }
    }

    fn validate(&self) -> Result<(), JobError> {
        if self.name.trim().is_empty() {
            return Err(JobError::InvalidConfig("job name must not be empty".into()));
        }
        if self.interval.is_zero() {
            return Err(JobError::InvalidConfig(format!(
                "job '{}' interval must be greater than zero",
                self.name
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for JobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobConfig")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Registry of armed job timers, keyed by job name.
#[derive(Default)]
pub struct Scheduler {
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn timers(&self) -> MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm a recurring timer for `config`.
    ///
    /// Registering a name that is already armed does nothing; the first
    /// registration keeps running.
    ///
    /// # Errors
    ///
    /// Returns `JobError::InvalidConfig` for a blank name or zero interval.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn register(&self, config: JobConfig) -> Result<(), JobError> {
        config.validate()?;
        let mut timers = self.timers();
        if timers.contains_key(&config.name) {
            tracing::debug!(job = %config.name, "job already registered, skipping");
            return Ok(());
        }
        tracing::info!(
            job = %config.name,
            interval_secs = config.interval.as_secs_f64(),
            "job registered"
        );
        let name = config.name.clone();
        timers.insert(name, tokio::spawn(run_timer(config)));
        Ok(())
    }

    /// Cancel future firings of `name`. Unknown names are ignored.
    pub fn stop(&self, name: &str) {
        if let Some(handle) = self.timers().remove(name) {
            handle.abort();
            tracing::info!(job = %name, "job stopped");
        }
    }

    /// Cancel every armed timer.
    pub fn stop_all(&self) {
        let drained: Vec<_> = self.timers().drain().collect();
        for (name, handle) in drained {
            handle.abort();
            tracing::info!(job = %name, "job stopped");
        }
    }

    /// Run `config`'s handler once, right now, outside any timer.
    ///
    /// # Errors
    ///
    /// Returns whatever error the handler returned.
    pub async fn run_once(&self, config: &JobConfig) -> Result<(), JobError> {
        let started = Instant::now();
        tracing::info!(job = %config.name, "running job once");
        let result = (config.handler)().await;
        match &result {
            Ok(()) => tracing::info!(
                job = %config.name,
                elapsed = ?started.elapsed(),
                "job run completed"
            ),
            Err(e) => tracing::error!(job = %config.name, error = %e, "job run failed"),
        }
        result
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.timers().contains_key(name)
    }

    /// Names of all armed jobs, sorted.
    #[must_use]
    pub fn job_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.timers().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for handle in self.timers().values() {
            handle.abort();
        }
    }
}

async fn run_timer(config: JobConfig) {
    let mut ticker = tokio::time::interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        run_tick(&config).await;
    }
}

async fn run_tick(config: &JobConfig) {
    let started = Instant::now();
    match tokio::spawn((config.handler)()).await {
        Ok(Ok(())) => tracing::debug!(
            job = %config.name,
            elapsed = ?started.elapsed(),
            "job tick completed"
        ),
        Ok(Err(e)) => tracing::error!(job = %config.name, error = %e, "job tick failed"),
        Err(join_error) => match panic_error(join_error) {
            Some(e) => tracing::error!(job = %config.name, error = %e, "job tick failed"),
            None => tracing::warn!(job = %config.name, "job tick cancelled"),
        },
    }
}

fn panic_error(join_error: JoinError) -> Option<JobError> {
    let payload = join_error.try_into_panic().ok()?;
    let message = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    Some(JobError::Panicked(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop(name: &str, interval: Duration) -> JobConfig {
        JobConfig::new(name, interval, || async { Ok(()) })
    }

    #[tokio::test]
    async fn rejects_blank_name_and_zero_interval() {
        let scheduler = Scheduler::new();
        let err = scheduler.register(noop("  ", Duration::from_secs(1))).unwrap_err();
        assert!(matches!(err, JobError::InvalidConfig(_)));
        let err = scheduler.register(noop("job", Duration::ZERO)).unwrap_err();
        assert!(matches!(err, JobError::InvalidConfig(_)));
        assert!(scheduler.job_names().is_empty());
    }

    #[tokio::test]
    async fn tracks_registered_names() {
        let scheduler = Scheduler::new();
        scheduler.register(noop("b", Duration::from_secs(1))).unwrap();
        scheduler.register(noop("a", Duration::from_secs(1))).unwrap();
        assert_eq!(scheduler.job_names(), vec!["a".to_string(), "b".to_string()]);
        assert!(scheduler.is_registered("a"));

        scheduler.stop("a");
        scheduler.stop("missing");
        assert!(!scheduler.is_registered("a"));
        assert_eq!(scheduler.job_names(), vec!["b".to_string()]);
    }

    #[test]
    fn panic_message_is_extracted() {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let join_error = rt
            .block_on(async { tokio::spawn(async { panic!("boom") }).await })
            .unwrap_err();
        let err = panic_error(join_error).unwrap();
        assert_eq!(err.to_string(), "Job handler panicked: boom");
    }

    #[tokio::test(start_paused = true)]
    async fn run_once_does_not_arm_timer() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let job = JobConfig::new("once", Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        });
        let scheduler = Scheduler::new();
        scheduler.run_once(&job).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_registered("once"));
    }
}
