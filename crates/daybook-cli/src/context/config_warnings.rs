use daybook_config::DaybookConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &DaybookConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &DaybookConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.store.is_remote() && has_env_prefix(&env_keys, "DAYBOOK_STORE_") {
        warnings.push(
            "Remote store appears unconfigured while DAYBOOK_STORE_* env vars exist. Use double underscores (example: DAYBOOK_STORE__URL)."
                .to_string(),
        );
    }

    warnings
}

/// A key under `prefix` that is not followed by the `__` section separator.
fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('_'))
    })
}

#[cfg(test)]
mod tests {
    use daybook_config::{DaybookConfig, StoreConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_single_underscore_store_keys() {
        let config = DaybookConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![("DAYBOOK_STORE_URL".to_string(), "libsql://demo".to_string())],
        );

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("DAYBOOK_STORE__URL"));
    }

    #[test]
    fn does_not_warn_when_store_is_configured() {
        let config = DaybookConfig {
            store: StoreConfig {
                url: "libsql://demo".to_string(),
                auth_token: "token".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let warnings = collect_unconfigured_warnings(
            &config,
            vec![("DAYBOOK_STORE__URL".to_string(), "libsql://demo".to_string())],
        );

        assert!(warnings.is_empty());
    }
}
