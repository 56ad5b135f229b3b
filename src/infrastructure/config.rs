// src/infrastructure/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_API_ENDPOINT: &str = "NOTEBOARD_API_ENDPOINT";
pub const ENV_API_KEY: &str = "NOTEBOARD_API_KEY";

/// TOML configuration for the note board client
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    /// Absent means a text-only board
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Signed-in session token in the `Authorization` header
    #[default]
    UserPool,
    /// Static key in the `x-api-key` header
    ApiKey,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_api_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub auth_mode: AuthMode,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_storage_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_api_endpoint() -> String { "http://localhost:20002/graphql".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_storage_endpoint() -> String { "http://localhost:20005".to_string() }
fn default_prefix() -> String { "public".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_api_endpoint(),
            auth_mode: AuthMode::default(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_storage_endpoint(),
            prefix: default_prefix(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// `<config_dir>/noteboard/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("noteboard").join("config.toml"))
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load an explicit file, or the default file when it exists, or defaults.
    /// Environment overrides are applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(path)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(ENV_API_ENDPOINT) {
            self.api.endpoint = endpoint;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api.api_key = key;
        }
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Create configuration file at path, with a storage section filled in
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self {
            storage: Some(StorageConfig::default()),
            ..Self::default()
        };
        config.save(path)?;
        Ok(config)
    }
}
