use clap::Subcommand;

/// Background job commands.
#[derive(Clone, Debug, Subcommand)]
pub enum JobCommands {
    /// List built-in jobs and their schedules.
    List,
    /// Run one job now and wait for it.
    Run { name: String },
}
