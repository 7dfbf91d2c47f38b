use osseo_core::enums::{AuditAction, EntityType};
use osseo_core::responses::AuditEntryView;
use osseo_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_timestamp};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(command: &AuditCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entries = fetch(command, ctx, flags).await?;
    output(&entries, flags.format)
}

pub async fn fetch(
    command: &AuditCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Vec<AuditEntryView>> {
    let filter = build_filter(command, flags, ctx.config.audit.default_limit)?;
    ctx.service.list_audit(&filter).await.map_err(Into::into)
}

fn build_filter(
    command: &AuditCommands,
    flags: &GlobalFlags,
    default_limit: u32,
) -> anyhow::Result<AuditFilter> {
    let AuditCommands::List {
        entity_type,
        entity_id,
        action,
        actor_id,
        since,
        until,
    } = command
    else {
        anyhow::bail!("audit list called with a different subcommand");
    };

    Ok(AuditFilter {
        entity_type: entity_type
            .as_deref()
            .map(|value| parse_enum::<EntityType>(value, "entity-type"))
            .transpose()?,
        entity_id: entity_id.clone(),
        action: action
            .as_deref()
            .map(|value| parse_enum::<AuditAction>(value, "action"))
            .transpose()?,
        actor_user_id: actor_id.clone(),
        since: since
            .as_deref()
            .map(|value| parse_timestamp(value, "since"))
            .transpose()?,
        until: until
            .as_deref()
            .map(|value| parse_timestamp(value, "until"))
            .transpose()?,
        limit: Some(effective_limit(None, flags.limit, default_limit)),
    })
}
