use anyhow::Context;
use poll_core::enums::CloseOutcome;
use poll_core::responses::PollCloseResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let requester = ctx.require_identity()?;
    let outcome = ctx
        .service
        .close_poll(id, requester)
        .await
        .context("Error closing poll")?;
    match outcome {
        CloseOutcome::Closed => ctx.notifier.success("Poll closed successfully"),
        CloseOutcome::AlreadyClosed => ctx.notifier.success("Poll is already closed"),
    }

    output(
        &PollCloseResponse {
            poll_id: id.to_string(),
            outcome,
        },
        flags.format,
    )
}
