use crate::cli::GlobalFlags;
use crate::cli::root_commands::SnapshotsArgs;
use crate::commands::shared::params::ParamMap;
use crate::context::AppContext;
use crate::output::output;

/// Handle `epoch snapshots`. `--limit` is the page size.
pub async fn handle(args: &SnapshotsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = ParamMap::default()
        .range(&args.range)
        .set("page", args.page)
        .set("limit", flags.limit)
        .set("majorChangesOnly", args.major_changes_only.then_some(true))
        .page_query(&ctx.config.general.query_defaults())?;

    let page = ctx.service.list_snapshot_page(&args.company_id, &query).await?;
    output(&page, flags.format)
}
