#[path = "audit/list.rs"]
mod list;
#[path = "audit/record.rs"]
mod record;
#[path = "audit/show.rs"]
mod show;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditCommands;
use crate::context::AppContext;

/// Handle `osseo audit`.
pub async fn handle(
    action: &AuditCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuditCommands::Show {
            entity_type,
            entity_id,
        } => show::run(entity_type, entity_id, ctx, flags).await,
        AuditCommands::Record {
            entity_type,
            entity_id,
            action,
            details,
            metadata,
        } => {
            record::run(
                record::RecordArgs {
                    entity_type,
                    entity_id,
                    action,
                    details: details.as_deref(),
                    metadata: metadata.as_deref(),
                },
                ctx,
                flags,
            )
            .await
        }
        AuditCommands::List { .. } => list::run(action, ctx, flags).await,
    }
}
