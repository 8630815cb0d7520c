use anyhow::Context;
use poll_core::responses::VoteResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, choice: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let voter = ctx.require_identity()?;
    let vote = ctx
        .service
        .cast_vote(voter, id, choice)
        .await
        .context("Failed to record vote")?;
    ctx.notifier.success("Vote recorded successfully!");

    output(
        &VoteResponse {
            poll_id: vote.poll_id.clone(),
            vote: Some(vote),
        },
        flags.format,
    )
}
