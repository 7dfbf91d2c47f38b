use std::sync::Arc;
use std::time::Instant;

use osseo_core::responses::{JobRunResponse, JobSummary};
use osseo_jobs::jobs::calendar_sync::NoopCalendarSource;
use osseo_jobs::jobs::{BuiltinJob, builtin_jobs};
use osseo_jobs::Scheduler;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::JobCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `osseo job`.
pub async fn handle(
    action: &JobCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        JobCommands::List => {
            let summaries: Vec<JobSummary> = jobs(ctx).iter().map(BuiltinJob::summary).collect();
            output(&summaries, flags.format)
        }
        JobCommands::Run { name } => {
            let job = jobs(ctx)
                .into_iter()
                .find(|job| job.config.name == *name)
                .ok_or_else(|| anyhow::anyhow!("unknown job '{name}'"))?;

            let started = Instant::now();
            Scheduler::new()
                .run_once(&job.config)
                .await
                .map_err(|error| anyhow::anyhow!("job '{name}' failed: {error}"))?;
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            output(
                &JobRunResponse {
                    name: name.clone(),
                    duration_ms,
                },
                flags.format,
            )
        }
    }
}

/// Built-in jobs configured for this process.
pub fn jobs(ctx: &AppContext) -> Vec<BuiltinJob> {
    builtin_jobs(&ctx.service, &ctx.config.jobs, Arc::new(NoopCalendarSource))
}
