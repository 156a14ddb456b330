//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use condense_context::CompactionConfig;
use condense_providers::CompactionClientConfig;
use condense_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};

pub const CONDENSE_DIR: &str = ".condense";
pub const DEFAULT_MODEL: &str = "gpt-5.2";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// CLI configuration, read from `config.toml`
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the compaction endpoint
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub default_model: Option<String>,

    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    #[serde(default)]
    pub compaction: CompactionConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl CliConfig {
    /// Load configuration from default locations
    pub fn load() -> Self {
        // 1. ~/.config/condense/config.toml
        // 2. ~/.condense/config.toml
        // 3. defaults
        Self::candidate_paths()
            .into_iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("condense").join("config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONDENSE_DIR).join("config.toml"));
        }
        paths
    }

    /// API key from the file, falling back to `OPENAI_API_KEY`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()))
    }

    pub fn model<'a>(&'a self, cli_model: Option<&'a str>) -> &'a str {
        cli_model
            .or(self.default_model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
    }

    pub fn client_config(&self, model: &str) -> Result<CompactionClientConfig> {
        let api_key = self.resolve_api_key().with_context(|| {
            format!(
                "No API key found. Set api_key in the config file or the {} environment variable",
                API_KEY_ENV
            )
        })?;

        let mut config =
            CompactionClientConfig::new(api_key, model).with_compaction(self.compaction.clone());
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(seconds) = self.timeout_seconds {
            config = config.with_timeout(seconds);
        }
        Ok(config)
    }
}
