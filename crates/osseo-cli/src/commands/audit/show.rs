use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    entity_type: &str,
    entity_id: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let page = ctx
        .service
        .query_audit_raw(entity_type, entity_id, flags.limit)
        .await?;
    output(&page, flags.format)
}
