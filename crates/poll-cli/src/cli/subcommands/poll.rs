use clap::{Args, Subcommand};

/// Poll commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PollCommands {
    /// Create a poll and print its code.
    Create(PollCreateArgs),
    /// Close a poll you own.
    Close { id: String },
    /// Look up a poll by its code.
    Join { code: String },
    /// Owner view: poll details, tally, and time left.
    Show { id: String },
    /// Owner view, live: countdown, auto-close at the deadline, and tally.
    Watch { id: String },
}

#[derive(Clone, Debug, Args)]
pub struct PollCreateArgs {
    #[arg(long)]
    pub question: String,
    /// Repeat once per option.
    #[arg(long = "option", value_name = "OPTION", required = true)]
    pub options: Vec<String>,
    /// Seconds until the poll closes (10-3600). Defaults to
    /// `lifecycle.default_duration_secs`.
    #[arg(long)]
    pub duration: Option<u32>,
}
