use anyhow::Context;
use futures::StreamExt;
use poll_core::responses::SweepResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SweepArgs;
use crate::commands::shared::live::interrupted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pollctl sweep`.
pub async fn handle(args: &SweepArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !args.watch {
        let closed = ctx
            .service
            .sweep_expired()
            .await
            .context("Error sweeping expired polls")?;
        return output(&SweepResponse { closed }, flags.format);
    }

    let interval = ctx.config.lifecycle.sweep_interval();
    tracing::info!(?interval, "sweeping expired polls until interrupted");
    let mut reports = ctx.service.spawn_sweeper(interval);
    loop {
        tokio::select! {
            report = reports.next() => match report {
                Some(Ok(closed)) => {
                    if !closed.is_empty() {
                        output(&SweepResponse { closed }, flags.format)?;
                    }
                }
                // Keep sweeping; the next tick may succeed.
                Some(Err(error)) => ctx.notifier.error(&format!("Error sweeping expired polls: {error}")),
                None => return Ok(()),
            },
            () = interrupted() => return Ok(()),
        }
    }
}
