//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHELLCACHE_*)
//! 2. TOML config file (if SHELLCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::assets::{AssetRegistry, DEFAULT_ASSETS, MatchMode};
use crate::fallback::FallbackPayload;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHELLCACHE_*)
/// 2. TOML config file (if SHELLCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name (version tag) of the active store.
    ///
    /// Set via SHELLCACHE_STORE_NAME environment variable.
    #[serde(default = "default_store_name")]
    pub store_name: String,

    /// Path to SQLite store database.
    ///
    /// Set via SHELLCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Origin the application shell is served from.
    ///
    /// Set via SHELLCACHE_APP_ORIGIN environment variable.
    #[serde(default = "default_app_origin")]
    pub app_origin: String,

    /// Host of the remote cocktail API.
    ///
    /// Set via SHELLCACHE_API_HOST environment variable.
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Path segment identifying the search endpoint.
    ///
    /// Set via SHELLCACHE_SEARCH_SEGMENT environment variable.
    #[serde(default = "default_search_segment")]
    pub search_segment: String,

    /// Shell path matching: "suffix" or "exact".
    ///
    /// Set via SHELLCACHE_MATCH_MODE environment variable.
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Application-shell asset paths, relative to `app_origin`.
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,

    /// Body served when a search request fails at the network layer.
    #[serde(default)]
    pub fallback: FallbackPayload,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SHELLCACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SHELLCACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to read per response.
    ///
    /// Set via SHELLCACHE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Number of shell assets fetched concurrently during install.
    ///
    /// Set via SHELLCACHE_PRECACHE_CONCURRENCY environment variable.
    #[serde(default = "default_precache_concurrency")]
    pub precache_concurrency: usize,

    /// Delete every other store when the worker activates.
    ///
    /// Set via SHELLCACHE_EVICT_STALE_STORES environment variable.
    #[serde(default)]
    pub evict_stale_stores: bool,
}

fn default_store_name() -> String {
    "cocktail-pwa-v2".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./shellcache.sqlite")
}

fn default_app_origin() -> String {
    "http://localhost:8080".into()
}

fn default_api_host() -> String {
    "www.thecocktaildb.com".into()
}

fn default_search_segment() -> String {
    "/search.php".into()
}

fn default_assets() -> Vec<String> {
    DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect()
}

fn default_user_agent() -> String {
    "shellcache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_precache_concurrency() -> usize {
    4
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_name: default_store_name(),
            db_path: default_db_path(),
            app_origin: default_app_origin(),
            api_host: default_api_host(),
            search_segment: default_search_segment(),
            match_mode: MatchMode::default(),
            assets: default_assets(),
            fallback: FallbackPayload::default(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            precache_concurrency: default_precache_concurrency(),
            evict_stale_stores: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The configured asset list as a registry.
    pub fn registry(&self) -> AssetRegistry {
        AssetRegistry::new(self.assets.iter().cloned())
    }

    /// Parsed application origin, used as the base for relative asset paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the origin is not an absolute
    /// http(s) URL.
    pub fn app_origin_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.app_origin)
            .map_err(|e| ConfigError::Invalid { field: "app_origin".into(), reason: e.to_string() })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::Invalid {
                field: "app_origin".into(),
                reason: format!("unsupported scheme: {scheme}"),
            }),
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHELLCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("SHELLCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store_name, "cocktail-pwa-v2");
        assert_eq!(config.db_path, PathBuf::from("./shellcache.sqlite"));
        assert_eq!(config.app_origin, "http://localhost:8080");
        assert_eq!(config.api_host, "www.thecocktaildb.com");
        assert_eq!(config.search_segment, "/search.php");
        assert_eq!(config.match_mode, MatchMode::Suffix);
        assert_eq!(config.assets.len(), 9);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.precache_concurrency, 4);
        assert!(!config.evict_stale_stores);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_app_origin_url() {
        let config = AppConfig::default();
        assert_eq!(config.app_origin_url().unwrap().as_str(), "http://localhost:8080/");

        let config = AppConfig { app_origin: "file:///srv/app".into(), ..Default::default() };
        assert!(matches!(config.app_origin_url(), Err(ConfigError::Invalid { field, .. }) if field == "app_origin"));
    }

    #[test]
    fn test_load_from_env_and_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "shellcache.toml",
                r#"
                store_name = "cocktail-pwa-v3"
                assets = ["./", "./index.html"]
                match_mode = "exact"
                "#,
            )?;
            jail.set_env("SHELLCACHE_CONFIG_FILE", "shellcache.toml");
            jail.set_env("SHELLCACHE_TIMEOUT_MS", "5000");
            jail.set_env("SHELLCACHE_STORE_NAME", "cocktail-pwa-v4");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.store_name, "cocktail-pwa-v4");
            assert_eq!(config.assets, vec!["./".to_string(), "./index.html".to_string()]);
            assert_eq!(config.match_mode, MatchMode::Exact);
            assert_eq!(config.timeout_ms, 5000);
            Ok(())
        });
    }
}
