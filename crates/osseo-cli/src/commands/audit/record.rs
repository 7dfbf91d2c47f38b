use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_json;
use crate::context::AppContext;
use crate::output::output;

pub struct RecordArgs<'a> {
    pub entity_type: &'a str,
    pub entity_id: &'a str,
    pub action: &'a str,
    pub details: Option<&'a str>,
    pub metadata: Option<&'a str>,
}

pub async fn run(args: RecordArgs<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let metadata = args
        .metadata
        .map(|raw| parse_json(raw, "metadata"))
        .transpose()?;
    let entry = ctx
        .service
        .record_audit_raw(
            args.entity_type,
            args.entity_id,
            args.action,
            args.details,
            metadata,
        )
        .await?;
    output(&entry, flags.format)
}
