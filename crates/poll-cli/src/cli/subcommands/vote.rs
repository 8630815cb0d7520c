use clap::Subcommand;

/// Vote commands.
#[derive(Clone, Debug, Subcommand)]
pub enum VoteCommands {
    /// Vote for one of a poll's options. Voting again replaces your vote.
    Cast { id: String, choice: String },
    /// Show your current vote.
    Mine { id: String },
}
