//! Helpers for commands that keep running until interrupted.

use futures::StreamExt;
use poll_core::entities::Poll;
use poll_core::responses::PollResultsResponse;
use poll_core::tally::Tally;
use poll_db::subscription::Subscription;

use crate::context::AppContext;

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn interrupted() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Next item of an optional subscription; pending forever when absent.
pub async fn next_or_pending<T>(subscription: &mut Option<Subscription<T>>) -> Option<T> {
    match subscription {
        Some(subscription) => subscription.next().await,
        None => std::future::pending().await,
    }
}

/// Results view as of the service clock.
pub fn results_view(ctx: &AppContext, poll: &Poll, tally: &Tally) -> PollResultsResponse {
    PollResultsResponse::new(poll.clone(), tally.clone(), ctx.service.clock().now())
}
