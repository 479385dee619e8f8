use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SnapshotCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `epoch snapshot`.
pub async fn handle(
    action: &SnapshotCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SnapshotCommands::Get { id } => {
            let snapshot = ctx
                .service
                .get_snapshot_detail(id)
                .await
                .with_context(|| format!("failed to fetch snapshot {id}"))?;
            output(&snapshot, flags.format)
        }
    }
}
