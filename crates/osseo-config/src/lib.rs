//! # osseo-config
//!
//! Layered configuration loading for Osseo using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`OSSEO_*` prefix, `__` as separator)
//! 2. Project-level `.osseo/config.toml`
//! 3. User-level `~/.config/osseo/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `OSSEO_DATABASE__PATH` -> `database.path`,
//! `OSSEO_JOBS__CALENDAR_SYNC__INTERVAL_SECS` -> `jobs.calendar_sync.interval_secs`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use osseo_config::OsseoConfig;
//!
//! let config = OsseoConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod audit;
mod database;
mod error;
mod jobs;

pub use audit::AuditConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use jobs::{
    AUTO_COMPLETE_INTERVAL_SECS, AutoCompleteSchedule, CALENDAR_SYNC_INTERVAL_SECS,
    CalendarSyncSchedule, JobSchedule, JobsConfig,
};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OsseoConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

impl OsseoConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".osseo/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("OSSEO_").split("__"))
    }

    /// Reject values the scheduler and history queries cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audit.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audit.default_limit".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.jobs.appointment_auto_complete.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "jobs.appointment_auto_complete.interval_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.jobs.calendar_sync.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "jobs.calendar_sync.interval_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("osseo").join("config.toml"))
    }
}
