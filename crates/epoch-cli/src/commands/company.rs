mod create;
mod get;
mod list;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CompanyCommands;
use crate::context::AppContext;

/// Handle `epoch company`.
pub async fn handle(
    action: &CompanyCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CompanyCommands::List => list::run(ctx, flags).await,
        CompanyCommands::Get { id } => get::run(id, ctx, flags).await,
        CompanyCommands::Create {
            name,
            domain,
            founded,
            industry,
        } => create::run(name, domain, founded.as_deref(), industry.as_deref(), ctx, flags).await,
        CompanyCommands::Update {
            id,
            name,
            domain,
            founded,
            industry,
        } => {
            update::run(
                id,
                update::Fields {
                    name: name.as_deref(),
                    domain: domain.as_deref(),
                    founded: founded.as_deref(),
                    industry: industry.as_deref(),
                },
                ctx,
                flags,
            )
            .await
        }
    }
}
