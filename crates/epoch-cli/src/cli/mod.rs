use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `epoch` binary.
#[derive(Debug, Parser)]
#[command(name = "epoch", version, about = "Epoch - website evolution timelines")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database path (overrides `database.path`)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::{CompanyCommands, SnapshotCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "epoch",
            "--format",
            "table",
            "--limit",
            "10",
            "--verbose",
            "seed",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Seed));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["epoch", "company", "list", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Company {
                action: CompanyCommands::List
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["epoch", "--format", "xml", "seed"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn output_format_accepts_all_supported_values() {
        for value in ["json", "table", "raw"] {
            let cli = Cli::try_parse_from(["epoch", "--format", value, "seed"])
                .expect("cli should parse");
            assert!(matches!(cli.command, Commands::Seed));
        }
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["epoch", "--db", "/tmp/demo.db", "seed"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.db.as_deref(), Some("/tmp/demo.db"));
    }

    #[test]
    fn company_update_takes_partial_fields() {
        let cli = Cli::try_parse_from(["epoch", "company", "update", "cmp-1", "--industry", "Design"])
            .expect("cli should parse");
        let Commands::Company {
            action:
                CompanyCommands::Update {
                    id,
                    name,
                    industry,
                    ..
                },
        } = cli.command
        else {
            panic!("expected company update");
        };
        assert_eq!(id, "cmp-1");
        assert_eq!(name, None);
        assert_eq!(industry.as_deref(), Some("Design"));
    }

    #[test]
    fn snapshots_flags_parse() {
        let cli = Cli::try_parse_from([
            "epoch",
            "snapshots",
            "cmp-1",
            "--page",
            "2",
            "--major-changes-only",
            "--start-date",
            "2005-01-01",
        ])
        .expect("cli should parse");
        let Commands::Snapshots(args) = cli.command else {
            panic!("expected snapshots");
        };
        assert_eq!(args.company_id, "cmp-1");
        assert_eq!(args.page, Some(2));
        assert!(args.major_changes_only);
        assert_eq!(args.range.start_date.as_deref(), Some("2005-01-01"));
    }

    #[test]
    fn snapshot_get_takes_id() {
        let cli = Cli::try_parse_from(["epoch", "snapshot", "get", "snp-1"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Snapshot {
                action: SnapshotCommands::Get { ref id }
            } if id == "snp-1"
        ));
    }

    #[test]
    fn play_defaults_to_local_store() {
        let cli = Cli::try_parse_from(["epoch", "play", "cmp-1"]).expect("cli should parse");
        let Commands::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert!(!args.remote);
        assert!(!args.detail);
        assert_eq!(args.speed, None);

        let cli = Cli::try_parse_from(["epoch", "play", "cmp-1", "--remote", "--speed", "2", "--detail"])
            .expect("cli should parse");
        let Commands::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert!(args.remote);
        assert!(args.detail);
        assert_eq!(args.speed, Some(2.0));
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["epoch", "serve", "--port", "4000"]).expect("cli should parse");
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, Some(4000));
        assert_eq!(args.host, None);
    }
}
