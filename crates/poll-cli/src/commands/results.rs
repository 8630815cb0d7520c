use anyhow::Context;
use futures::StreamExt;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResultsArgs;
use crate::commands::shared::live::{interrupted, results_view};
use crate::context::AppContext;
use crate::output::output_results;

/// Handle `pollctl results`.
pub async fn handle(args: &ResultsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (mut poll, mut tally) = ctx
        .service
        .poll_results(&args.id)
        .await
        .context("Error loading results")?;
    output_results(&results_view(ctx, &poll, &tally), flags.format)?;
    if !args.follow {
        return Ok(());
    }

    let mut polls = ctx.service.observe_poll(&poll.id)?;
    let mut tallies = ctx.service.observe_tally(&poll.id, poll.options.clone())?;
    let mut shown = (poll.clone(), tally.clone());

    loop {
        tokio::select! {
            Some(snapshot) = polls.next() => poll = snapshot.context("Error loading poll")?,
            Some(snapshot) = tallies.next() => tally = snapshot.context("Error loading results")?,
            () = interrupted() => return Ok(()),
            else => return Ok(()),
        }
        if shown.0 != poll || shown.1 != tally {
            output_results(&results_view(ctx, &poll, &tally), flags.format)?;
            shown = (poll.clone(), tally.clone());
        }
    }
}
