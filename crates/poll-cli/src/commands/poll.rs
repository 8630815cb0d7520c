mod close;
mod create;
mod join;
mod show;
mod watch;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PollCommands;
use crate::context::AppContext;

/// Handle `pollctl poll`.
pub async fn handle(action: &PollCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        PollCommands::Create(args) => create::run(args, ctx, flags).await,
        PollCommands::Close { id } => close::run(id, ctx, flags).await,
        PollCommands::Join { code } => join::run(code, ctx, flags).await,
        PollCommands::Show { id } => show::run(id, ctx, flags).await,
        PollCommands::Watch { id } => watch::run(id, ctx, flags).await,
    }
}
