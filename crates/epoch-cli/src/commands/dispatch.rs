use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => commands::serve::handle(&args, ctx, flags).await,
        Commands::Seed => commands::seed::handle(&ctx, flags).await,
        Commands::Company { action } => commands::company::handle(&action, &ctx, flags).await,
        Commands::Timeline(args) => commands::timeline::handle(&args, &ctx, flags).await,
        Commands::Snapshots(args) => commands::snapshots::handle(&args, &ctx, flags).await,
        Commands::Snapshot { action } => commands::snapshot::handle(&action, &ctx, flags).await,
        Commands::Play(args) => commands::play::handle_local(&args, &ctx, flags).await,
    }
}
