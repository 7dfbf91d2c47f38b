//! # osseo-jobs
//!
//! Named periodic jobs on a tokio runtime.
//!
//! A [`Scheduler`] owns one timer task per registered job. Each firing runs
//! the job's handler on its own task; a failing or panicking tick is logged
//! and the timer keeps going. [`jobs`] holds the concrete maintenance jobs
//! and [`jobs::builtin_jobs`] assembles them from configuration.

pub mod error;
pub mod jobs;
pub mod scheduler;

pub use error::JobError;
pub use scheduler::{JobConfig, JobHandler, Scheduler};
