//! Values written in a `.env` file flow through figment's env provider.
//!
//! The `.env` pairs are read with `dotenvy::from_path_iter` and handed to
//! the jail, so nothing leaks into the process environment of other tests.

use figment::Jail;
use osseo_config::OsseoConfig;
use pretty_assertions::assert_eq;

fn load_dotenv_into(jail: &mut Jail) -> figment::error::Result<()> {
    for item in dotenvy::from_path_iter(".env").map_err(|e| e.to_string())? {
        let (key, value) = item.map_err(|e| e.to_string())?;
        jail.set_env(key, value);
    }
    Ok(())
}

#[test]
fn dotenv_values_reach_config() {
    Jail::expect_with(|jail| {
        jail.create_file(
            ".env",
            "# local overrides\n\
             OSSEO_DATABASE__PATH=data/clinic.db\n\
             OSSEO_JOBS__CALENDAR_SYNC__ENABLED=false\n\
             OSSEO_JOBS__APPOINTMENT_AUTO_COMPLETE__INTERVAL_SECS=30\n",
        )?;
        load_dotenv_into(jail)?;

        let config = OsseoConfig::from_figment(&OsseoConfig::figment())
            .map_err(|e| e.to_string())?;
        assert_eq!(config.database.path, "data/clinic.db");
        assert!(!config.jobs.calendar_sync.enabled);
        assert_eq!(config.jobs.auto_complete().interval_secs, 30);
        Ok(())
    });
}

#[test]
fn dotenv_env_beats_project_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(".osseo").map_err(|e| e.to_string())?;
        jail.create_file(
            ".osseo/config.toml",
            r"
[audit]
default_limit = 10

[database]
path = 'toml.db'
",
        )?;
        jail.create_file(".env", "OSSEO_AUDIT__DEFAULT_LIMIT=99\n")?;
        load_dotenv_into(jail)?;

        let config = OsseoConfig::from_figment(&OsseoConfig::figment())
            .map_err(|e| e.to_string())?;
        assert_eq!(config.audit.default_limit, 99);
        assert_eq!(config.database.path, "toml.db");
        Ok(())
    });
}
