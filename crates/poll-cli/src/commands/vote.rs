mod cast;
mod mine;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::VoteCommands;
use crate::context::AppContext;

/// Handle `pollctl vote`.
pub async fn handle(action: &VoteCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        VoteCommands::Cast { id, choice } => cast::run(id, choice, ctx, flags).await,
        VoteCommands::Mine { id } => mine::run(id, ctx, flags).await,
    }
}
