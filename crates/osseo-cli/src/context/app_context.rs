use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use osseo_config::OsseoConfig;
use osseo_core::identity::Actor;
use osseo_db::service::ClinicService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<ClinicService>,
    pub config: OsseoConfig,
}

impl AppContext {
    /// Open the database named by `--db` or `database.path`, acting as `--actor`.
    pub async fn init(config: OsseoConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let db_path = flags
            .db
            .clone()
            .unwrap_or_else(|| config.database.path.clone());

        if let Some(parent) = database_dir(&db_path) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let actor = flags.actor.clone().map(Actor::new);
        let service = ClinicService::new_local(&db_path, actor)
            .await
            .with_context(|| format!("failed to open database at {db_path}"))?
            .with_default_audit_limit(config.audit.default_limit);
        tracing::debug!(db = %db_path, actor = ?flags.actor, "application context ready");

        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }
}

/// Directory that must exist before opening `path`, if any.
fn database_dir(path: &str) -> Option<&Path> {
    if path == ":memory:" {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn flags(db: Option<String>, actor: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            quiet: false,
            verbose: false,
            db,
            actor: actor.map(String::from),
        }
    }

    #[tokio::test]
    async fn creates_missing_database_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("osseo.db");
        let ctx = AppContext::init(
            OsseoConfig::default(),
            &flags(Some(db_path.to_string_lossy().into_owned()), Some("usr-1")),
        )
        .await
        .unwrap();

        assert!(db_path.exists());
        assert_eq!(ctx.service.actor().map(|a| a.user_id.as_str()), Some("usr-1"));
    }

    #[test]
    fn database_dir_skips_memory_and_bare_names() {
        assert_eq!(database_dir(":memory:"), None);
        assert_eq!(database_dir("osseo.db"), None);
        assert_eq!(database_dir(".osseo/osseo.db"), Some(Path::new(".osseo")));
    }

    #[tokio::test]
    async fn applies_configured_audit_limit() {
        let mut config = OsseoConfig::default();
        config.audit.default_limit = 7;
        let ctx = AppContext::init(config, &flags(Some(":memory:".into()), None))
            .await
            .unwrap();
        assert_eq!(ctx.service.default_audit_limit(), 7);
        assert!(ctx.service.actor().is_none());
    }
}
