use clap::Subcommand;

/// Company entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CompanyCommands {
    /// List companies with snapshot and milestone counts.
    List,
    /// Get a company with its snapshots and milestones.
    Get { id: String },
    /// Create a company.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        domain: String,
        /// `YYYY-MM-DD` or RFC 3339
        #[arg(long)]
        founded: Option<String>,
        #[arg(long)]
        industry: Option<String>,
    },
    /// Update a company; omitted fields are left unchanged.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        founded: Option<String>,
        #[arg(long)]
        industry: Option<String>,
    },
}
