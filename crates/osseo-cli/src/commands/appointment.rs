use osseo_core::enums::AppointmentStatus;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AppointmentCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_timestamp};
use crate::context::AppContext;
use crate::output::output;

/// Handle `osseo appointment`.
pub async fn handle(
    action: &AppointmentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AppointmentCommands::Create {
            patient,
            title,
            start,
            end,
        } => {
            let start = parse_timestamp(start, "start")?;
            let end = parse_timestamp(end, "end")?;
            let appointment = ctx
                .service
                .create_appointment(patient, title, start, end)
                .await?;
            output(&appointment, flags.format)
        }
        AppointmentCommands::Get { id } => {
            output(&ctx.service.get_appointment(id).await?, flags.format)
        }
        AppointmentCommands::List { status } => {
            let status = status
                .as_deref()
                .map(|value| parse_enum::<AppointmentStatus>(value, "status"))
                .transpose()?;
            let limit = effective_limit(None, flags.limit, ctx.config.audit.default_limit);
            let appointments = ctx.service.list_appointments(status, limit).await?;
            output(&appointments, flags.format)
        }
        AppointmentCommands::Cancel { id, reason } => {
            let appointment = ctx
                .service
                .cancel_appointment(id, reason.as_deref())
                .await?;
            output(&appointment, flags.format)
        }
        AppointmentCommands::Link {
            id,
            provider,
            external_id,
        } => {
            let link = ctx
                .service
                .link_appointment(id, provider, external_id)
                .await?;
            output(&link, flags.format)
        }
    }
}
