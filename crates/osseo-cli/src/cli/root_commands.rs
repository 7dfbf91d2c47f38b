use clap::Subcommand;

use crate::cli::subcommands::{AppointmentCommands, AuditCommands, JobCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the enabled background jobs until Ctrl-C.
    Serve,
    /// Audit history.
    Audit {
        #[command(subcommand)]
        action: AuditCommands,
    },
    /// Background jobs.
    Job {
        #[command(subcommand)]
        action: JobCommands,
    },
    /// Appointments.
    Appointment {
        #[command(subcommand)]
        action: AppointmentCommands,
    },
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}
