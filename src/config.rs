use anyhow::Result;
use config::{Config, Environment, File};
use sea_orm::Database;
use serde::Deserialize;
use std::time::Duration;

use crate::schemas::AppState;

/// Runtime settings read from defaults, an optional `edurust.{toml,yaml,json}`
/// file and `EDURUST_*` environment variables, later sources winning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Maximum number of entries in the settings cache
    pub cache_capacity: u64,
    /// Seconds a cached settings row stays valid
    pub cache_ttl_secs: u64,
    /// Seconds before a request is aborted
    pub request_timeout_secs: u64,
    /// Receipt numbers tried per payment before giving up
    pub receipt_max_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            cache_ttl_secs: 300,
            request_timeout_secs: 30,
            receipt_max_attempts: compute::fees::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from the working directory and environment.
    pub fn load() -> Result<Self> {
        Self::load_from("edurust")
    }

    fn load_from(file_stem: &str) -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("cache_capacity", defaults.cache_capacity)?
            .set_default("cache_ttl_secs", defaults.cache_ttl_secs)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("receipt_max_attempts", defaults.receipt_max_attempts as u64)?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(Environment::with_prefix("EDURUST").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Initialize application state for the given database
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    let config = AppConfig::load()?;

    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState::new(db, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load_from("no-such-edurust-config").unwrap();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.receipt_max_attempts, 5);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("edurust-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("edurust.toml");
        std::fs::write(&path, "cache_ttl_secs = 60\nreceipt_max_attempts = 8\n").unwrap();

        let stem = dir.join("edurust");
        let config = AppConfig::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.receipt_max_attempts, 8);
        assert_eq!(config.cache_capacity, 1000);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
