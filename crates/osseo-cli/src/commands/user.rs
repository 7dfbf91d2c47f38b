use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `osseo user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Create { display_name } => {
            output(&ctx.service.create_user(display_name).await?, flags.format)
        }
        UserCommands::Get { id } => output(&ctx.service.get_user(id).await?, flags.format),
    }
}
