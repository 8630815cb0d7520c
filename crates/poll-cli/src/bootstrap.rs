use anyhow::Context;
use poll_config::PollConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, the layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<PollConfig> {
    load_dotenv()?;
    let mut config = PollConfig::load().context("failed to load configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded dotenv file");
            Ok(())
        }
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(error).context("failed to load .env"),
    }
}

fn apply_overrides(config: &mut PollConfig, flags: &GlobalFlags) {
    if let Some(store) = flags.store.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        config.store.path = store.to_string();
    }
}
