use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `cinv` binary.
#[derive(Debug, Parser)]
#[command(name = "cinv", version, about = "Campus inventory - university equipment tracking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (defaults to `general.default_format`)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Max results to return (page size for paginated listings)
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Page number for paginated listings, starting at 1
    #[arg(long, global = true)]
    pub page: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Username to act as (defaults to `general.user`)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Project root path (defaults to auto-detect via .inventory)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract global flags, taking the output format from config when the
    /// flag is absent.
    #[must_use]
    pub fn global_flags(&self, default_format: OutputFormat) -> GlobalFlags {
        GlobalFlags {
            format: self.format.unwrap_or(default_format),
            limit: self.limit,
            page: self.page,
            quiet: self.quiet,
            verbose: self.verbose,
            user: self.user.clone(),
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{EquipmentCommands, RepairCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "cinv", "--format", "table", "--limit", "25", "--page", "2", "--user", "admin",
            "stats",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Table));
        assert_eq!(cli.limit, Some(25));
        assert_eq!(cli.page, Some(2));
        assert_eq!(cli.user.as_deref(), Some("admin"));
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["cinv", "stats", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Raw));
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["cinv", "--format", "xml", "stats"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn format_falls_back_to_config_default() {
        let cli = Cli::try_parse_from(["cinv", "--project", "/tmp/demo", "stats"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags(OutputFormat::Table);
        assert_eq!(flags.format, OutputFormat::Table);
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
        assert_eq!(OutputFormat::from_config("RAW"), OutputFormat::Raw);
        assert_eq!(OutputFormat::from_config(""), OutputFormat::Json);
    }

    #[test]
    fn nested_equipment_commands_parse() {
        let cli = Cli::try_parse_from([
            "cinv", "equipment", "create", "--type", "etp-1", "--room", "rom-1", "--inn", "1001",
            "Projector",
        ])
        .expect("cli should parse");
        let Commands::Equipment { action } = cli.command else {
            panic!("expected equipment command");
        };
        let EquipmentCommands::Create(args) = action else {
            panic!("expected create");
        };
        assert_eq!(args.name, "Projector");
        assert_eq!(args.inn, Some(1001));

        let cli = Cli::try_parse_from(["cinv", "repair", "update", "rep-1", "completed"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Repair {
                action: RepairCommands::Update { .. }
            }
        ));
    }

    #[test]
    fn labels_need_ids_and_default_directory() {
        assert!(Cli::try_parse_from(["cinv", "equipment", "labels"]).is_err());
        let cli = Cli::try_parse_from(["cinv", "equipment", "labels", "eqp-1", "eqp-2"])
            .expect("cli should parse");
        let Commands::Equipment {
            action: EquipmentCommands::Labels { ids, out },
        } = cli.command
        else {
            panic!("expected equipment labels");
        };
        assert_eq!(ids, vec!["eqp-1", "eqp-2"]);
        assert_eq!(out, std::path::PathBuf::from("labels"));
    }

    #[test]
    fn move_requires_rooms() {
        assert!(Cli::try_parse_from(["cinv", "move", "eqp-1"]).is_err());
        let cli = Cli::try_parse_from([
            "cinv", "move", "--from", "rom-1", "--to", "rom-2", "eqp-1", "eqp-2",
        ])
        .expect("cli should parse");
        let Commands::Move(args) = cli.command else {
            panic!("expected move");
        };
        assert_eq!(args.ids, vec!["eqp-1", "eqp-2"]);
    }
}
