use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut companies = ctx.service.list_companies().await?;
    if let Some(limit) = flags.limit {
        companies.truncate(usize::try_from(limit)?);
    }
    output(&companies, flags.format)
}
