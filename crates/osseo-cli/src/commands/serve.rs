use anyhow::Context;
use osseo_jobs::Scheduler;

use crate::commands::job::jobs;
use crate::context::AppContext;

/// Handle `osseo serve`: run enabled jobs until Ctrl-C.
pub async fn handle(ctx: &AppContext) -> anyhow::Result<()> {
    let scheduler = Scheduler::new();
    for job in jobs(ctx) {
        if job.enabled {
            scheduler.register(job.config)?;
        } else {
            tracing::info!(job = %job.config.name, "job disabled by configuration");
        }
    }
    tracing::info!(jobs = ?scheduler.job_names(), "scheduler running");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    tracing::info!("shutting down scheduler");
    scheduler.stop_all();
    Ok(())
}
