//! Wall-clock source for expiry decisions.

use std::fmt;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall time derived from the Tokio clock, anchored at construction.
///
/// Follows `tokio::time::pause`/`advance`, so expiry logic and the timers
/// that drive it agree under a paused test runtime.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    anchor_wall: DateTime<Utc>,
    anchor_instant: Instant,
}

impl RuntimeClock {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    #[must_use]
    pub fn starting_at(anchor_wall: DateTime<Utc>) -> Self {
        Self {
            anchor_wall,
            anchor_instant: Instant::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = self.anchor_instant.elapsed();
        chrono::Duration::from_std(elapsed)
            .ok()
            .and_then(|elapsed| self.anchor_wall.checked_add_signed(elapsed))
            .unwrap_or(self.anchor_wall)
    }
}
