//! Poll lifecycle configuration: default duration, expiry check cadence,
//! and the late-vote policy.

use std::time::Duration;

use poll_core::validation::{MAX_DURATION_SECS, MIN_DURATION_SECS, validate_duration};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_duration_secs() -> u32 {
    60
}

const fn default_check_interval_ms() -> u64 {
    1000
}

const fn default_sweep_interval_secs() -> u64 {
    30
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LifecycleConfig {
    /// Duration used by `poll create` when `--duration` is omitted.
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u32,

    /// Tick of the expiry watcher and countdown.
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,

    /// Period of `pollctl sweep --watch`.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Refuse votes on closed or expired polls.
    #[serde(default = "default_true")]
    pub reject_late_votes: bool,

    /// Close an expired-but-active poll when someone joins it.
    #[serde(default = "default_true")]
    pub close_on_join: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration_secs(),
            check_interval_ms: default_check_interval_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
            reject_late_votes: true,
            close_on_join: true,
        }
    }
}

impl LifecycleConfig {
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if validate_duration(self.default_duration_secs).is_err() {
            return Err(ConfigError::invalid(
                "lifecycle.default_duration_secs",
                format!("must be within {MIN_DURATION_SECS}..={MAX_DURATION_SECS}"),
            ));
        }
        if self.check_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "lifecycle.check_interval_ms",
                "must be > 0",
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "lifecycle.sweep_interval_secs",
                "must be > 0",
            ));
        }
        Ok(())
    }
}
