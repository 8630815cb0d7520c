//! Service layer for poll lifecycle and votes.
//!
//! `PollService` wraps a [`DocumentStore`] and the lifecycle settings. Repo
//! methods live in [`crate::repos`] as `impl PollService`; expiry streams
//! live in [`crate::expiry`].

use std::sync::Arc;
use std::time::Duration;

use poll_config::LifecycleConfig;

use crate::clock::{Clock, SystemClock};
use crate::store::DocumentStore;

/// Lifecycle behavior knobs, usually taken from `[lifecycle]` config.
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    /// Tick of the expiry watcher and countdown streams.
    pub check_interval: Duration,
    /// Refuse votes on polls that are closed or past their deadline.
    pub reject_late_votes: bool,
    /// Close an active poll found past its deadline during `join_poll`.
    pub close_on_join: bool,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self::from(&LifecycleConfig::default())
    }
}

impl From<&LifecycleConfig> for LifecycleSettings {
    fn from(config: &LifecycleConfig) -> Self {
        Self {
            check_interval: config.check_interval(),
            reject_late_votes: config.reject_late_votes,
            close_on_join: config.close_on_join,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollService<S> {
    store: S,
    settings: LifecycleSettings,
    clock: Arc<dyn Clock>,
}

impl<S: DocumentStore> PollService<S> {
    #[must_use]
    pub fn new(store: S, settings: LifecycleSettings) -> Self {
        Self {
            store,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock used for expiry decisions.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub(crate) fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}
