use poll_core::responses::VoteResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let voter = ctx.require_identity()?;
    let vote = ctx.service.my_vote(voter, id).await?;
    if let Some(vote) = &vote {
        tracing::debug!(poll_id = id, choice = %vote.choice, "found existing vote");
    }
    output(
        &VoteResponse {
            poll_id: id.to_string(),
            vote,
        },
        flags.format,
    )
}
