use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve => commands::serve::handle(ctx).await,
        Commands::Audit { action } => commands::audit::handle(&action, ctx, flags).await,
        Commands::Job { action } => commands::job::handle(&action, ctx, flags).await,
        Commands::Appointment { action } => {
            commands::appointment::handle(&action, ctx, flags).await
        }
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
    }
}
