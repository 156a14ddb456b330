//! Compaction configuration

use serde::{Deserialize, Serialize};

use crate::ContextError;

/// When and how a conversation gets compacted.
///
/// Every field has a serde default, so a partial document is merged over
/// the defaults on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactionConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Fraction of the model's context window at which compaction triggers
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: f64,

    /// Conversations smaller than this are never compacted
    #[serde(default = "default_min_tokens")]
    pub min_tokens_before_compaction: usize,

    /// Forward caller instructions to the compaction request
    #[serde(default = "default_preserve_instructions")]
    pub preserve_instructions: bool,

    /// Extra guidance appended to the request instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compaction_prompt: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_threshold_percent() -> f64 {
    0.70
}

fn default_min_tokens() -> usize {
    10_000
}

fn default_preserve_instructions() -> bool {
    true
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            threshold_percent: default_threshold_percent(),
            min_tokens_before_compaction: default_min_tokens(),
            preserve_instructions: default_preserve_instructions(),
            compaction_prompt: None,
        }
    }
}

impl CompactionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_threshold_percent(mut self, threshold_percent: f64) -> Self {
        self.threshold_percent = threshold_percent;
        self
    }

    pub fn with_min_tokens(mut self, min_tokens: usize) -> Self {
        self.min_tokens_before_compaction = min_tokens;
        self
    }

    pub fn with_preserve_instructions(mut self, preserve: bool) -> Self {
        self.preserve_instructions = preserve;
        self
    }

    pub fn with_compaction_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.compaction_prompt = Some(prompt.into());
        self
    }

    pub fn validate(&self) -> Result<(), ContextError> {
        // also rejects NaN
        if !(self.threshold_percent > 0.0 && self.threshold_percent <= 1.0) {
            return Err(ContextError::InvalidThreshold(self.threshold_percent));
        }
        Ok(())
    }
}
