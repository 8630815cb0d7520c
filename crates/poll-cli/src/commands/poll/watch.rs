use std::sync::Arc;

use anyhow::Context;
use futures::StreamExt;
use poll_core::tally::Tally;
use poll_db::expiry::ExpiryEvent;

use crate::cli::GlobalFlags;
use crate::commands::shared::live::{interrupted, next_or_pending, results_view};
use crate::context::AppContext;
use crate::output::output_results;

/// Live owner view. Re-renders on every countdown tick, tally change, and
/// poll change; returns once the poll is closed or on Ctrl-C.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let owner = ctx.require_identity()?;
    let mut poll = ctx
        .service
        .admin_poll(id, owner)
        .await
        .context("Error loading poll")?;

    let mut polls = ctx.service.observe_poll(&poll.id)?;
    let mut tallies = ctx.service.observe_tally(&poll.id, poll.options.clone())?;
    let mut expiry = poll
        .is_active
        .then(|| ctx.service.watch_expiry(&poll, Arc::clone(&ctx.notifier)));
    let mut tally: Option<Tally> = None;

    loop {
        tokio::select! {
            Some(snapshot) = polls.next() => {
                poll = snapshot.context("Error loading poll")?;
                if !poll.is_active {
                    expiry = None;
                }
            }
            Some(snapshot) = tallies.next() => {
                tally = Some(snapshot.context("Error loading results")?);
            }
            Some(event) = next_or_pending(&mut expiry) => {
                if event.is_terminal() {
                    tracing::debug!(?event, "expiry watcher finished");
                    expiry = None;
                }
                if let ExpiryEvent::Failed { .. } = event {
                    // Reported through the notifier; keep showing the live view.
                    continue;
                }
            }
            () = interrupted() => return Ok(()),
            else => return Ok(()),
        }

        if let Some(tally) = &tally {
            output_results(&results_view(ctx, &poll, tally), flags.format)?;
            if !poll.is_active {
                return Ok(());
            }
        }
    }
}
