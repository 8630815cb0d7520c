use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Poll { action } => commands::poll::handle(&action, ctx, flags).await,
        Commands::Vote { action } => commands::vote::handle(&action, ctx, flags).await,
        Commands::Results(args) => commands::results::handle(&args, ctx, flags).await,
        Commands::Countdown(args) => commands::countdown::handle(&args, ctx, flags).await,
        Commands::Sweep(args) => commands::sweep::handle(&args, ctx, flags).await,
    }
}
