use anyhow::Context;
use futures::StreamExt;
use poll_core::countdown::COUNTDOWN_ZERO;
use poll_core::responses::CountdownResponse;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CountdownArgs;
use crate::commands::shared::live::interrupted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pollctl countdown`: one line per tick until `00:00`.
pub async fn handle(args: &CountdownArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let poll = ctx
        .service
        .get_poll(&args.id)
        .await
        .context("Error fetching poll")?;
    let line = |time_left: String| CountdownResponse {
        poll_id: poll.id.clone(),
        time_left,
    };

    if !poll.is_active {
        return output(&line(COUNTDOWN_ZERO.to_string()), flags.format);
    }

    let mut ticks = ctx.service.countdown(poll.expires_at);
    loop {
        tokio::select! {
            tick = ticks.next() => match tick {
                Some(time_left) => output(&line(time_left), flags.format)?,
                None => return Ok(()),
            },
            () = interrupted() => return Ok(()),
        }
    }
}
