//! Compaction client configuration

use condense_context::CompactionConfig;
use secrecy::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Everything a [`crate::CompactionClient`] needs, fixed at construction
#[derive(Debug, Clone)]
pub struct CompactionClientConfig {
    pub api_key: SecretString,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_seconds: Option<u64>,
    pub compaction: CompactionConfig,
}

impl CompactionClientConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: None,
            model: model.into(),
            timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
            compaction: CompactionConfig::default(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn with_compaction(mut self, compaction: CompactionConfig) -> Self {
        self.compaction = compaction;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}
