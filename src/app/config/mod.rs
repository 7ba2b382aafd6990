// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language
//! - `[api]` - Backend base URL and user agent
//! - `[catalog]` - Recent-items limit
//! - `[routing]` - Address scheme (`path` or `query`)
//! - `[query]` - Similarity search result count
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` or set `PART_FINDER_CONFIG_DIR`
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use part_finder::config::{self, Config};
//!
//! let (mut config, _warning) = config::load();
//! config.general.language = Some("fr".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::{Error, Result};
use crate::gallery::RouteScheme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ApiConfig {
    /// Base URL of the catalog service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// User agent override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Catalog list settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// How many items the recent list shows.
    #[serde(default = "default_recent_limit", skip_serializing_if = "Option::is_none")]
    pub recent_limit: Option<usize>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

/// Address binding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RoutingConfig {
    /// Where the open item id lives in the address.
    #[serde(default)]
    pub scheme: RouteScheme,
}

/// Similarity query settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryConfig {
    /// Number of matches to request.
    #[serde(default = "default_top_k", skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

// =============================================================================
// Main Config Struct
// =============================================================================

/// Application configuration with sectioned organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

impl Config {
    /// Recent-items limit, clamped to the supported range.
    #[must_use]
    pub fn recent_limit(&self) -> usize {
        self.catalog
            .recent_limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(MIN_RECENT_LIMIT, MAX_RECENT_LIMIT)
    }

    /// Similarity result count, clamped to the supported range.
    #[must_use]
    pub fn top_k(&self) -> usize {
        self.query
            .top_k
            .unwrap_or(DEFAULT_TOP_K)
            .clamp(MIN_TOP_K, MAX_TOP_K)
    }

    /// User agent to send, falling back to the built-in one.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.api
            .user_agent
            .as_deref()
            .filter(|ua| !ua.is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Resolves the backend base URL.
    ///
    /// Priority: `cli` argument, `PART_FINDER_API_URL`, `[api] base_url`,
    /// then [`DEFAULT_API_BASE_URL`].
    #[must_use]
    pub fn api_base_url(&self, cli: Option<&str>) -> String {
        let env = std::env::var(ENV_API_URL).ok();
        let url = [cli, env.as_deref(), self.api.base_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string();
        url
    }
}

#[allow(clippy::unnecessary_wraps)]
fn default_recent_limit() -> Option<usize> {
    Some(DEFAULT_RECENT_LIMIT)
}

#[allow(clippy::unnecessary_wraps)]
fn default_top_k() -> Option<usize> {
    Some(DEFAULT_TOP_K)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with an i18n key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    log::warn!("ignoring {}: {}", path.display(), err);
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            general: GeneralConfig {
                language: Some("fr".to_string()),
            },
            api: ApiConfig {
                base_url: Some("http://parts.local:9000".to_string()),
                user_agent: None,
            },
            catalog: CatalogConfig {
                recent_limit: Some(10),
            },
            routing: RoutingConfig {
                scheme: RouteScheme::Query,
            },
            query: QueryConfig { top_k: Some(8) },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn missing_sections_use_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[routing]\nscheme = \"query\"\n").expect("write file");

        let loaded = load_from_path(&config_path).expect("load");
        assert_eq!(loaded.routing.scheme, RouteScheme::Query);
        assert_eq!(loaded.recent_limit(), DEFAULT_RECENT_LIMIT);
        assert_eq!(loaded.top_k(), DEFAULT_TOP_K);
        assert_eq!(loaded.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = Config {
            catalog: CatalogConfig {
                recent_limit: Some(0),
            },
            query: QueryConfig {
                top_k: Some(10_000),
            },
            ..Config::default()
        };
        assert_eq!(config.recent_limit(), MIN_RECENT_LIMIT);
        assert_eq!(config.top_k(), MAX_TOP_K);
    }

    #[test]
    fn cli_api_url_wins() {
        let config = Config {
            api: ApiConfig {
                base_url: Some("http://from-config".to_string()),
                user_agent: None,
            },
            ..Config::default()
        };
        assert_eq!(config.api_base_url(Some("http://from-cli")), "http://from-cli");
    }

    #[test]
    fn load_with_override_from_empty_directory_returns_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert!(warning.is_none(), "should not warn for missing file");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_with_override_from_corrupted_file_returns_default_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        fs::write(base_dir.join("settings.toml"), "not = valid = toml").expect("write file");

        let (config, warning) = load_with_override(Some(base_dir));
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_with_override_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let nested_dir = temp_dir.path().join("nested").join("deeply");

        save_with_override(&Config::default(), Some(nested_dir.clone()))
            .expect("save should succeed");
        assert!(nested_dir.join("settings.toml").exists());
    }
}
