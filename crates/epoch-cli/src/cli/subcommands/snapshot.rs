use clap::Subcommand;

/// Snapshot entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SnapshotCommands {
    /// Get a snapshot with its company, sources, commentary and design analysis.
    Get { id: String },
}
