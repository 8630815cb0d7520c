use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `pollctl` binary.
#[derive(Debug, Parser)]
#[command(name = "pollctl", version, about = "Livepoll - real-time polls from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Table coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Quiet mode (suppress notifications and non-essential logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Act as this user id instead of the configured identity
    #[arg(long = "as", value_name = "USER", global = true)]
    pub as_user: Option<String>,

    /// Database path (overrides store.path)
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            color: self.color,
            quiet: self.quiet,
            verbose: self.verbose,
            as_user: self.as_user.clone(),
            store: self.store.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{PollCommands, VoteCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "pollctl", "--format", "table", "--as", "ada", "--verbose", "sweep",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.as_user.as_deref(), Some("ada"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Sweep(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["pollctl", "results", "AB12CD34", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Results(ref args) if args.id == "AB12CD34" && !args.follow));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["pollctl", "--format", "xml", "sweep"]).is_err());
    }

    #[test]
    fn poll_create_collects_repeated_options() {
        let cli = Cli::try_parse_from([
            "pollctl", "poll", "create", "--question", "Lunch?", "--option", "Pizza", "--option",
            "Sushi", "--duration", "90",
        ])
        .expect("cli should parse");

        let Commands::Poll {
            action: PollCommands::Create(args),
        } = cli.command
        else {
            panic!("expected poll create");
        };
        assert_eq!(args.question, "Lunch?");
        assert_eq!(args.options, vec!["Pizza".to_string(), "Sushi".to_string()]);
        assert_eq!(args.duration, Some(90));
    }

    #[test]
    fn vote_cast_takes_id_and_choice() {
        let cli = Cli::try_parse_from(["pollctl", "vote", "cast", "AB12CD34", "Pizza"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Vote { action: VoteCommands::Cast { ref id, ref choice } }
                if id == "AB12CD34" && choice == "Pizza"
        ));
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["pollctl", "--store", "/tmp/poll.db", "sweep", "--watch"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.store.as_deref(), Some("/tmp/poll.db"));
        assert!(flags.as_user.is_none());
    }
}
