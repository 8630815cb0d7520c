use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::commands::shared::live::results_view;
use crate::context::AppContext;
use crate::output::output_results;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let owner = ctx.require_identity()?;
    let poll = ctx
        .service
        .admin_poll(id, owner)
        .await
        .context("Error loading poll")?;
    let tally = ctx.service.tally(&poll.id, &poll.options).await?;
    output_results(&results_view(ctx, &poll, &tally), flags.format)
}
