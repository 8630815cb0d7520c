use anyhow::Context;
use poll_core::responses::PollCreateResponse;
use poll_core::validation::NewPoll;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PollCreateArgs;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &PollCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let owner = ctx.require_identity()?;
    let duration = args
        .duration
        .unwrap_or(ctx.config.lifecycle.default_duration_secs);
    let request = NewPoll::new(args.question.as_str(), args.options.iter().cloned(), duration);

    let poll = ctx
        .service
        .create_poll(owner, &request)
        .await
        .context("Error creating poll")?;
    ctx.notifier.success("Poll created successfully!");

    output(
        &PollCreateResponse {
            poll_code: poll.id.clone(),
            poll,
        },
        flags.format,
    )
}
