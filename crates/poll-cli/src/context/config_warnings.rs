use poll_config::PollConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &PollConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

/// Config sections and an example key for each.
const SECTIONS: [(&str, &str); 3] = [
    ("STORE", "POLL_STORE__PATH"),
    ("LIFECYCLE", "POLL_LIFECYCLE__REJECT_LATE_VOTES"),
    ("IDENTITY", "POLL_IDENTITY__USER_ID"),
];

fn collect_unconfigured_warnings<I>(config: &PollConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();
    for (section, example) in SECTIONS {
        let single = format!("POLL_{section}_");
        let double = format!("POLL_{section}__");
        let mistyped = env_keys
            .iter()
            .any(|key| key.starts_with(&single) && !key.starts_with(&double));
        if mistyped {
            warnings.push(format!(
                "POLL_{section}_* env vars are ignored without a double underscore (example: {example})."
            ));
        }
    }

    if !config.identity.is_configured() && env_keys.iter().any(|key| key == "POLL_USER") {
        warnings.push(
            "POLL_USER is not read; set POLL_IDENTITY__USER_ID or pass --as USER.".to_string(),
        );
    }

    warnings
}
