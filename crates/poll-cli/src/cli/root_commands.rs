use clap::{Args, Subcommand};

use crate::cli::subcommands::{PollCommands, VoteCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create, join, close, and watch polls.
    Poll {
        #[command(subcommand)]
        action: PollCommands,
    },
    /// Cast or inspect your vote.
    Vote {
        #[command(subcommand)]
        action: VoteCommands,
    },
    /// Show a poll's tally and chart.
    Results(ResultsArgs),
    /// Count down to a poll's deadline.
    Countdown(CountdownArgs),
    /// Close every active poll past its deadline.
    Sweep(SweepArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ResultsArgs {
    /// Poll id.
    pub id: String,
    /// Keep printing as votes arrive, until interrupted.
    #[arg(long)]
    pub follow: bool,
}

#[derive(Clone, Debug, Args)]
pub struct CountdownArgs {
    /// Poll id.
    pub id: String,
}

#[derive(Clone, Debug, Args)]
pub struct SweepArgs {
    /// Keep sweeping every `lifecycle.sweep_interval_secs`, until interrupted.
    #[arg(long)]
    pub watch: bool,
}
