use anyhow::Context;
use osseo_config::OsseoConfig;

/// Load `.env` (if present) and the layered configuration.
pub fn load_config() -> anyhow::Result<OsseoConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded dotenv file"),
        Err(error) if error.not_found() => {}
        Err(error) => return Err(error).context("failed to load .env file"),
    }
    OsseoConfig::load().context("failed to load osseo configuration")
}
