use osseo_config::OsseoConfig;

const SECTIONS: [&str; 3] = ["DATABASE", "AUDIT", "JOBS"];

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &OsseoConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &OsseoConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    for section in SECTIONS {
        let single = format!("OSSEO_{section}_");
        let double = format!("OSSEO_{section}__");
        if let Some(key) = env_keys
            .iter()
            .find(|key| key.starts_with(&single) && !key.starts_with(&double))
        {
            warnings.push(format!(
                "{key} is ignored. Nested config keys use double underscores (example: {double}{})",
                example_field(section)
            ));
        }
    }

    if config.database.is_in_memory() {
        warnings.push(
            "database.path is ':memory:'; audit history will not survive this process".to_string(),
        );
    }

    warnings
}

fn example_field(section: &str) -> &'static str {
    match section {
        "DATABASE" => "PATH",
        "AUDIT" => "DEFAULT_LIMIT",
        _ => "CALENDAR_SYNC__ENABLED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(keys: &[&str]) -> Vec<(String, String)> {
        keys.iter()
            .map(|key| ((*key).to_string(), "x".to_string()))
            .collect()
    }

    #[test]
    fn single_underscore_keys_are_flagged() {
        let warnings = collect_unconfigured_warnings(
            &OsseoConfig::default(),
            env(&["OSSEO_DATABASE_PATH", "OSSEO_JOBS__CALENDAR_SYNC__ENABLED"]),
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("OSSEO_DATABASE_PATH"));
        assert!(warnings[0].contains("OSSEO_DATABASE__PATH"));
    }

    #[test]
    fn well_formed_env_is_quiet() {
        let warnings = collect_unconfigured_warnings(
            &OsseoConfig::default(),
            env(&["OSSEO_AUDIT__DEFAULT_LIMIT", "OSSEO_LOG", "PATH"]),
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn in_memory_database_is_flagged() {
        let mut config = OsseoConfig::default();
        config.database.path = ":memory:".into();
        let warnings = collect_unconfigured_warnings(&config, env(&[]));
        assert_eq!(warnings.len(), 1);
    }
}
