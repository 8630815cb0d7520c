use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(code: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let summary = ctx
        .service
        .join_poll(code)
        .await
        .context("Error fetching poll")?;
    if !summary.is_active {
        ctx.notifier
            .success("This poll has ended; see `pollctl results` for the outcome");
    }
    output(&summary, flags.format)
}
