use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create a user.
    Create { display_name: String },
    /// Get a user by ID.
    Get { id: String },
}
