//! `mm:ss` countdown formatting.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Rendered value once the window has closed.
pub const COUNTDOWN_ZERO: &str = "00:00";

/// Format a remaining duration as `mm:ss`, flooring to whole seconds.
///
/// Minutes are not wrapped into hours, so a full hour renders as `60:00`.
#[must_use]
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Time left until `expires_at` as seen at `now`, clamped at zero.
#[must_use]
pub fn remaining_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (expires_at - now).to_std().unwrap_or(Duration::ZERO)
}

/// Format the time left until `expires_at`. Never negative.
#[must_use]
pub fn format_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_remaining(remaining_until(expires_at, now))
}
