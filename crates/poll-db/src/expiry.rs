//! Countdown streams and the expiry watcher behind the admin view.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use poll_core::countdown::{COUNTDOWN_ZERO, format_remaining, remaining_until};
use poll_core::entities::Poll;
use poll_core::notify::Notifier;

use crate::clock::Clock;
use crate::service::PollService;
use crate::store::DocumentStore;
use crate::subscription::Subscription;

/// Message sent to the notifier when the watcher closes a poll.
pub const POLL_ENDED_MESSAGE: &str = "Poll has ended";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExpiryEvent {
    /// Time left, as `mm:ss`.
    Tick { time_left: String },
    /// The watcher closed the poll.
    Closed { poll_id: String },
    /// The deadline passed but the poll was already closed.
    AlreadyClosed { poll_id: String },
    /// Closing failed. Not retried.
    Failed { poll_id: String, message: String },
}

impl ExpiryEvent {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Tick { .. })
    }
}

fn ticker(period: Duration) -> tokio::time::Interval {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// `mm:ss` until `expires_at`, once per `period`, ending after `"00:00"`.
pub fn observe_countdown(
    clock: Arc<dyn Clock>,
    expires_at: DateTime<Utc>,
    period: Duration,
) -> Subscription<String> {
    Subscription::spawn(move |tx| async move {
        let mut ticker = ticker(period);
        loop {
            ticker.tick().await;
            let time_left = format_remaining(remaining_until(expires_at, clock.now()));
            let done = time_left == COUNTDOWN_ZERO;
            if tx.send(time_left).await.is_err() || done {
                return;
            }
        }
    })
}

impl<S: DocumentStore> PollService<S> {
    /// Countdown to `expires_at` on this service's clock and check interval.
    pub fn countdown(&self, expires_at: DateTime<Utc>) -> Subscription<String> {
        observe_countdown(self.clock(), expires_at, self.settings().check_interval)
    }

    /// Tick until the poll's deadline, then close it.
    ///
    /// The close is best effort: a failure goes to `notifier` and ends the
    /// stream with [`ExpiryEvent::Failed`].
    pub fn watch_expiry(&self, poll: &Poll, notifier: Arc<dyn Notifier>) -> Subscription<ExpiryEvent> {
        let service = self.clone();
        let poll_id = poll.id.clone();
        let expires_at = poll.expires_at;
        let clock = self.clock();
        let period = self.settings().check_interval;

        Subscription::spawn(move |tx| async move {
            let mut ticker = ticker(period);
            let mut last_tick: Option<String> = None;
            loop {
                ticker.tick().await;
                let remaining = remaining_until(expires_at, clock.now());
                let time_left = format_remaining(remaining);
                // Under a second left already reads "00:00"; say it once.
                if last_tick.as_deref() != Some(time_left.as_str()) {
                    last_tick = Some(time_left.clone());
                    if tx.send(ExpiryEvent::Tick { time_left }).await.is_err() {
                        return;
                    }
                }
                if !remaining.is_zero() {
                    continue;
                }

                let outcome = match service.expire_poll(&poll_id).await {
                    Ok(true) => {
                        notifier.success(POLL_ENDED_MESSAGE);
                        ExpiryEvent::Closed { poll_id }
                    }
                    Ok(false) => ExpiryEvent::AlreadyClosed { poll_id },
                    Err(err) => {
                        tracing::warn!(poll_id = %poll_id, error = %err, "expiry close failed");
                        notifier.error(&format!("Error closing poll: {err}"));
                        ExpiryEvent::Failed {
                            poll_id,
                            message: err.to_string(),
                        }
                    }
                };
                // The consumer may already be gone; the close happened regardless.
                let _ = tx.send(outcome).await;
                return;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    use poll_core::enums::NotifyLevel;
    use poll_core::notify::MemoryNotifier;
    use poll_core::validation::NewPoll;

    use super::*;
    use crate::clock::RuntimeClock;
    use crate::test_support::helpers::{failing_service, owner, test_service};

    fn is_mm_ss(s: &str) -> bool {
        let bytes = s.as_bytes();
        s.len() == 5 && bytes[2] == b':' && s.chars().filter(char::is_ascii_digit).count() == 4
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ends_at_zero() {
        let clock = Arc::new(RuntimeClock::new());
        let expires_at = clock.now() + chrono::Duration::seconds(5);

        let ticks: Vec<String> = observe_countdown(clock, expires_at, Duration::from_secs(1))
            .collect()
            .await;

        assert_eq!(ticks.first().map(String::as_str), Some("00:05"));
        assert_eq!(ticks.last().map(String::as_str), Some(COUNTDOWN_ZERO));
        assert_eq!(ticks.iter().filter(|t| *t == COUNTDOWN_ZERO).count(), 1);
        assert!(ticks.iter().all(|t| is_mm_ss(t)));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_of_past_deadline_is_single_zero() {
        let clock = Arc::new(RuntimeClock::new());
        let expires_at = clock.now() - chrono::Duration::seconds(30);
        let ticks: Vec<String> = observe_countdown(clock, expires_at, Duration::from_secs(1))
            .collect()
            .await;
        assert_eq!(ticks, vec![COUNTDOWN_ZERO.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn watcher_closes_expired_poll_and_notifies() {
        let svc = test_service()
            .await
            .with_clock(Arc::new(RuntimeClock::new()));
        let poll = svc
            .create_poll(&owner(), &NewPoll::new("Lunch?", ["Pizza", "Sushi"], 10))
            .await
            .unwrap();
        let notifier = Arc::new(MemoryNotifier::new());

        let events: Vec<ExpiryEvent> = svc
            .watch_expiry(&poll, notifier.clone())
            .collect()
            .await;

        let (last, rest) = events.split_last().unwrap();
        assert_eq!(last, &ExpiryEvent::Closed { poll_id: poll.id.clone() });
        assert_eq!(
            rest.last(),
            Some(&ExpiryEvent::Tick {
                time_left: COUNTDOWN_ZERO.to_string()
            })
        );
        assert!(rest.len() >= 2);
        assert!(rest.iter().all(|event| matches!(
            event,
            ExpiryEvent::Tick { time_left } if is_mm_ss(time_left)
        )));
        assert_eq!(
            notifier.messages(),
            vec![(NotifyLevel::Success, POLL_ENDED_MESSAGE.to_string())]
        );
        assert!(!svc.get_poll(&poll.id).await.unwrap().is_active);
    }

    #[tokio::test(start_paused = true)]
    async fn watcher_sends_zero_once_when_ticks_straddle_deadline() {
        let svc = test_service()
            .await
            .with_clock(Arc::new(RuntimeClock::new()));
        let poll = svc
            .create_poll(&owner(), &NewPoll::new("Lunch?", ["Pizza", "Sushi"], 10))
            .await
            .unwrap();
        // Ticks land half a second off the deadline: the last one before it
        // floors to "00:00" with time still left.
        tokio::time::advance(Duration::from_millis(500)).await;

        let events: Vec<ExpiryEvent> = svc
            .watch_expiry(&poll, Arc::new(poll_core::notify::SilentNotifier))
            .collect()
            .await;

        let zeros = events
            .iter()
            .filter(|event| matches!(event, ExpiryEvent::Tick { time_left } if time_left == COUNTDOWN_ZERO))
            .count();
        assert_eq!(zeros, 1);
        let (last, rest) = events.split_last().unwrap();
        assert_eq!(last, &ExpiryEvent::Closed { poll_id: poll.id.clone() });
        assert_eq!(
            rest.last(),
            Some(&ExpiryEvent::Tick {
                time_left: COUNTDOWN_ZERO.to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn watcher_reports_already_closed_poll() {
        let svc = test_service()
            .await
            .with_clock(Arc::new(RuntimeClock::new()));
        let poll = svc
            .create_poll(&owner(), &NewPoll::new("Lunch?", ["Pizza", "Sushi"], 10))
            .await
            .unwrap();
        svc.close_poll(&poll.id, &owner()).await.unwrap();
        let notifier = Arc::new(MemoryNotifier::new());

        let events: Vec<ExpiryEvent> = svc
            .watch_expiry(&poll, notifier.clone())
            .collect()
            .await;
        assert_eq!(
            events.last(),
            Some(&ExpiryEvent::AlreadyClosed { poll_id: poll.id.clone() })
        );
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn watcher_reports_failed_close_to_notifier() {
        let svc = failing_service();
        let now = Utc::now();
        let poll = Poll {
            id: "AB12CD34".into(),
            question: "Lunch?".into(),
            options: vec!["Pizza".into(), "Sushi".into()],
            created_by: owner().user_id,
            created_at: now - chrono::Duration::minutes(2),
            expires_at: now - chrono::Duration::minutes(1),
            is_active: true,
        };
        let notifier = Arc::new(MemoryNotifier::new());

        let events: Vec<ExpiryEvent> = svc
            .watch_expiry(&poll, notifier.clone())
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], ExpiryEvent::Failed { message, .. } if message.contains("store offline")));
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, NotifyLevel::Error);
        assert!(messages[0].1.starts_with("Error closing poll"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_watcher_leaves_poll_open() {
        let svc = test_service()
            .await
            .with_clock(Arc::new(RuntimeClock::new()));
        let poll = svc
            .create_poll(&owner(), &NewPoll::new("Lunch?", ["Pizza", "Sushi"], 10))
            .await
            .unwrap();
        let mut watcher = svc.watch_expiry(&poll, Arc::new(poll_core::notify::SilentNotifier));
        assert!(matches!(watcher.next().await, Some(ExpiryEvent::Tick { .. })));
        watcher.unsubscribe();

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(svc.get_poll(&poll.id).await.unwrap().is_active);
    }
}
