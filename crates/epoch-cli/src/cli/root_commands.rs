use clap::{Args, Subcommand};

use crate::cli::subcommands::{CompanyCommands, SnapshotCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Insert demo companies, snapshots and milestones into an empty store.
    Seed,
    /// Companies.
    Company {
        #[command(subcommand)]
        action: CompanyCommands,
    },
    /// Merged snapshot and milestone timeline for a company.
    Timeline(TimelineArgs),
    /// Paginated snapshot listing for a company.
    Snapshots(SnapshotsArgs),
    /// Snapshots.
    Snapshot {
        #[command(subcommand)]
        action: SnapshotCommands,
    },
    /// Auto-play a company's timeline in the terminal.
    Play(PlayArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Bind host (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,
    /// Bind port (overrides `server.port`)
    #[arg(long)]
    pub port: Option<u16>,
}

/// `YYYY-MM-DD` or RFC 3339 bounds, both inclusive.
#[derive(Clone, Debug, Default, Args)]
pub struct DateRangeArgs {
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct TimelineArgs {
    pub company_id: String,
    #[command(flatten)]
    pub range: DateRangeArgs,
}

#[derive(Clone, Debug, Args)]
pub struct SnapshotsArgs {
    pub company_id: String,
    /// 1-based page number
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub major_changes_only: bool,
    #[command(flatten)]
    pub range: DateRangeArgs,
}

#[derive(Clone, Debug, Args)]
pub struct PlayArgs {
    pub company_id: String,
    /// Fetch through the HTTP API at `client.api_url` instead of the local store
    #[arg(long)]
    pub remote: bool,
    /// Playback speed multiplier, one of `playback.speeds`
    #[arg(long)]
    pub speed: Option<f64>,
    /// Also print stats, sources, commentary and design for each snapshot
    #[arg(long)]
    pub detail: bool,
    #[command(flatten)]
    pub range: DateRangeArgs,
}
