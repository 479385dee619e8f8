use crate::cli::GlobalFlags;
use crate::cli::root_commands::TimelineArgs;
use crate::commands::shared::params::ParamMap;
use crate::context::AppContext;
use crate::output::output;

/// Handle `epoch timeline`. `--limit` caps the snapshot count.
pub async fn handle(args: &TimelineArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = ParamMap::default()
        .range(&args.range)
        .set("limit", flags.limit)
        .timeline_query(&ctx.config.general.query_defaults())?;

    let data = ctx.service.get_timeline(&args.company_id, &query).await?;
    output(&data, flags.format)
}
