//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable overriding `api.base_url`.
pub const ENV_BASE_URL: &str = "INVENTORY_BASE_URL";
/// Environment variable overriding `api.company_id`.
pub const ENV_COMPANY_ID: &str = "INVENTORY_COMPANY_ID";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Inventory API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Where favorites and compare lists are persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply `INVENTORY_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            log::debug!("Using {} from environment", ENV_BASE_URL);
            self.api.base_url = base_url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_COMPANY_ID) {
            match raw.trim().parse::<u64>() {
                Ok(id) => self.api.company_id = id,
                Err(_) => log::warn!("Ignoring invalid {}={:?}", ENV_COMPANY_ID, raw),
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.api.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "api.base_url must be http(s), got '{}'",
                base.scheme()
            )));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.api.default_page_size == 0 {
            return Err(AppError::validation("api.default_page_size must be > 0"));
        }
        if self.storage.key_prefix.trim().is_empty() {
            return Err(AppError::validation("storage.key_prefix is empty"));
        }
        Ok(())
    }
}

/// Inventory API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, without the `/inventory/` path
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Dealer account whose inventory is listed
    #[serde(default = "defaults::company_id")]
    pub company_id: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// How long a fetched page may be reused; 0 disables caching
    #[serde(default = "defaults::cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Units per inventory page
    #[serde(default = "defaults::page_size")]
    pub default_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            company_id: defaults::company_id(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            cache_ttl_secs: defaults::cache_ttl(),
            default_page_size: defaults::page_size(),
        }
    }
}

/// Saved-list storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per list
    #[serde(default = "defaults::storage_dir")]
    pub dir: PathBuf,

    /// Prefix for list keys (`{prefix}-favorites`, `{prefix}-compare`)
    #[serde(default = "defaults::key_prefix")]
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
            key_prefix: defaults::key_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn base_url() -> String {
        "https://inventory.coasttechnology.org/api/v3".into()
    }
    pub fn company_id() -> u64 {
        43
    }
    pub fn user_agent() -> String {
        concat!("lotfront/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn cache_ttl() -> u64 {
        300
    }
    pub fn page_size() -> u32 {
        crate::models::DEFAULT_PAGE_SIZE
    }
    pub fn storage_dir() -> PathBuf {
        PathBuf::from("storage")
    }
    pub fn key_prefix() -> String {
        "terrytownrv".into()
    }
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://inventory.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            company_id = 7
            cache_ttl_secs = 0

            [storage]
            dir = "/tmp/lists"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.company_id, 7);
        assert_eq!(config.api.cache_ttl_secs, 0);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.dir, PathBuf::from("/tmp/lists"));
        assert_eq!(config.storage.key_prefix, "terrytownrv");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn overrides_replace_api_settings() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ENV_BASE_URL => Some("http://localhost:8080/api/v3".to_string()),
            ENV_COMPANY_ID => Some("99".to_string()),
            _ => None,
        });

        assert_eq!(config.api.base_url, "http://localhost:8080/api/v3");
        assert_eq!(config.api.company_id, 99);
    }

    #[test]
    fn invalid_company_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == ENV_COMPANY_ID).then(|| "abc".to_string()));
        assert_eq!(config.api.company_id, 43);
    }

    #[test]
    fn load_or_default_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[api]\ncompany_id = 12\n[storage]\nkey_prefix = \"demo\"\n").unwrap();

        let config = Config::load_or_default(&path);
        assert_eq!(config.api.company_id, 12);
        assert_eq!(config.storage.key_prefix, "demo");
    }

    #[test]
    fn load_or_default_falls_back() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = Config::load_or_default(tmp.path().join("missing.toml"));
        assert_eq!(missing.api.company_id, 43);

        let broken = tmp.path().join("broken.toml");
        fs::write(&broken, "[api\ncompany_id = ").unwrap();
        assert!(Config::load(&broken).is_err());
        assert_eq!(Config::load_or_default(&broken).storage.key_prefix, "terrytownrv");
    }
}
