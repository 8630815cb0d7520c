//! # poll-config
//!
//! Layered configuration loading for Livepoll using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`POLL_*` prefix, `__` as separator)
//! 2. Project-level `.livepoll/config.toml`
//! 3. User-level `~/.config/livepoll/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `POLL_STORE__PATH` -> `store.path`,
//! `POLL_LIFECYCLE__REJECT_LATE_VOTES` -> `lifecycle.reject_late_votes`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use poll_config::PollConfig;
//!
//! let config = PollConfig::load().expect("config");
//! println!("store: {}", config.store.path);
//! ```

mod error;
mod identity;
mod lifecycle;
mod store;

pub use error::ConfigError;
pub use identity::IdentityConfig;
pub use lifecycle::LifecycleConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory holding project-local config and the default database.
pub const PROJECT_DIR: &str = ".livepoll";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PollConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

impl PollConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// `.env` loading is left to the caller.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("POLL_").split("__"))
    }

    /// Reject values that would make the lifecycle loops misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lifecycle.validate()?;
        self.store.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("livepoll").join("config.toml"))
    }
}
