use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let company = ctx
        .service
        .get_company_detail(id)
        .await
        .with_context(|| format!("failed to fetch company {id}"))?;
    output(&company, flags.format)
}
