use std::sync::Arc;

use anyhow::Context;
use poll_config::PollConfig;
use poll_core::identity::AuthIdentity;
use poll_core::notify::Notifier;
use poll_db::PollDb;
use poll_db::service::{LifecycleSettings, PollService};

use crate::cli::GlobalFlags;
use crate::notify::ConsoleNotifier;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: PollService<PollDb>,
    pub config: PollConfig,
    pub identity: Option<AuthIdentity>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Open the store named by the config and resolve the acting user.
    pub async fn init(config: PollConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let db = PollDb::open(&config.store)
            .await
            .with_context(|| format!("failed to open poll store at {}", config.store.path))?;
        let service = PollService::new(db, LifecycleSettings::from(&config.lifecycle));
        let identity = resolve_identity(flags.as_user.as_deref(), &config);
        tracing::debug!(
            store = %config.store.path,
            user = identity.as_ref().map_or("-", |id| id.user_id.as_str()),
            "application context ready"
        );

        Ok(Self {
            service,
            config,
            identity,
            notifier: Arc::new(ConsoleNotifier::new(flags.quiet)),
        })
    }

    /// The acting user, for commands that act on someone's behalf.
    pub fn require_identity(&self) -> anyhow::Result<&AuthIdentity> {
        self.identity.as_ref().context(
            "not signed in: pass --as USER or set identity.user_id (POLL_IDENTITY__USER_ID)",
        )
    }
}

/// `--as` wins over the configured identity.
fn resolve_identity(as_user: Option<&str>, config: &PollConfig) -> Option<AuthIdentity> {
    match as_user.map(str::trim).filter(|user| !user.is_empty()) {
        Some(user) => Some(AuthIdentity::new(user)),
        None => config.identity.to_identity(),
    }
}

#[cfg(test)]
mod tests {
    use poll_config::IdentityConfig;

    use super::*;

    fn configured() -> PollConfig {
        PollConfig {
            identity: IdentityConfig {
                user_id: "user-ada".into(),
                display_name: "Ada".into(),
            },
            ..PollConfig::default()
        }
    }

    #[test]
    fn flag_overrides_configured_identity() {
        let identity = resolve_identity(Some("user-bob"), &configured()).unwrap();
        assert_eq!(identity.user_id, "user-bob");
    }

    #[test]
    fn configured_identity_is_used_without_flag() {
        let identity = resolve_identity(None, &configured()).unwrap();
        assert_eq!(identity.label(), "Ada");
    }

    #[test]
    fn no_identity_without_flag_or_config() {
        assert!(resolve_identity(Some("  "), &PollConfig::default()).is_none());
    }

    #[tokio::test]
    async fn commands_without_identity_fail_with_not_signed_in() {
        let mut config = PollConfig::default();
        config.store.path = ":memory:".into();
        let flags = GlobalFlags {
            format: crate::cli::OutputFormat::Json,
            color: crate::cli::ColorMode::Never,
            quiet: true,
            verbose: false,
            as_user: None,
            store: None,
        };
        let ctx = AppContext::init(config, &flags).await.unwrap();
        let err = ctx.require_identity().unwrap_err();
        assert!(err.to_string().starts_with("not signed in"));
    }
}
