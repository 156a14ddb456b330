//! Compaction triggering policy

use std::fmt;

use serde::Serialize;

use crate::{models, CompactionConfig};

/// Outcome of a policy check, one variant per gate in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyDecision {
    Disabled,
    UnsupportedModel,
    BelowMinimum,
    BelowThreshold,
    Triggered,
}

impl PolicyDecision {
    pub fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered)
    }
}

impl fmt::Display for PolicyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Disabled => "compaction disabled",
            Self::UnsupportedModel => "model does not support compaction",
            Self::BelowMinimum => "below minimum token count",
            Self::BelowThreshold => "below context window threshold",
            Self::Triggered => "compaction triggered",
        };
        f.write_str(reason)
    }
}

/// Policy bound to one model's context window
#[derive(Debug, Clone)]
pub struct CompactionPolicy {
    context_window: usize,
    supports_compaction: bool,
    config: CompactionConfig,
}

impl CompactionPolicy {
    pub fn new(context_window: usize, supports_compaction: bool, config: CompactionConfig) -> Self {
        Self {
            context_window,
            supports_compaction,
            config,
        }
    }

    pub fn for_model(model: &str, config: CompactionConfig) -> Self {
        let info = models::model_info(model);
        Self::new(info.context_window, info.supports_compaction, config)
    }

    pub fn evaluate(&self, current_tokens: usize) -> PolicyDecision {
        if !self.config.enabled {
            return PolicyDecision::Disabled;
        }
        if !self.supports_compaction {
            return PolicyDecision::UnsupportedModel;
        }
        if current_tokens < self.config.min_tokens_before_compaction {
            return PolicyDecision::BelowMinimum;
        }
        if (current_tokens as f64) < self.threshold_tokens() {
            return PolicyDecision::BelowThreshold;
        }
        PolicyDecision::Triggered
    }

    pub fn should_compact(&self, current_tokens: usize) -> bool {
        self.evaluate(current_tokens).is_triggered()
    }

    /// Token count at which the window threshold is reached (inclusive)
    pub fn threshold_tokens(&self) -> f64 {
        self.context_window as f64 * self.config.threshold_percent
    }

    pub fn usage_ratio(&self, current_tokens: usize) -> f64 {
        if self.context_window == 0 {
            return 1.0;
        }
        current_tokens as f64 / self.context_window as f64
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    pub fn supports_compaction(&self) -> bool {
        self.supports_compaction
    }

    pub fn config(&self) -> &CompactionConfig {
        &self.config
    }
}

pub fn should_compact(current_tokens: usize, model: &str, config: &CompactionConfig) -> bool {
    CompactionPolicy::for_model(model, config.clone()).should_compact(current_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CompactionConfig {
        CompactionConfig::new()
            .with_threshold_percent(0.70)
            .with_min_tokens(10_000)
    }

    #[test]
    fn test_disabled_never_compacts() {
        let config = config().with_enabled(false);
        for tokens in [0, 10_000, 280_000, 10_000_000] {
            assert!(!should_compact(tokens, "gpt-5.2", &config));
        }
        let policy = CompactionPolicy::for_model("gpt-5.2", config);
        assert_eq!(policy.evaluate(10_000_000), PolicyDecision::Disabled);
    }

    #[test]
    fn test_unsupported_model() {
        let policy = CompactionPolicy::for_model("claude-x", config());
        assert!(!policy.supports_compaction());
        assert_eq!(policy.evaluate(1_000_000), PolicyDecision::UnsupportedModel);
        assert!(!should_compact(1_000_000, "claude-x", &config()));
    }

    #[test]
    fn test_below_minimum() {
        // tiny window so the threshold gate alone would pass
        let policy = CompactionPolicy::new(1_000, true, config());
        assert_eq!(policy.evaluate(9_999), PolicyDecision::BelowMinimum);
        assert_eq!(policy.evaluate(10_000), PolicyDecision::Triggered);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let policy = CompactionPolicy::for_model("gpt-5.2", config());
        assert_eq!(policy.context_window(), 400_000);
        assert_eq!(policy.threshold_tokens(), 280_000.0);

        assert_eq!(policy.evaluate(279_999), PolicyDecision::BelowThreshold);
        assert_eq!(policy.evaluate(280_000), PolicyDecision::Triggered);
        assert_eq!(policy.evaluate(300_000), PolicyDecision::Triggered);
    }

    #[test]
    fn test_minimum_boundary_is_inclusive() {
        let config = config().with_min_tokens(50_000).with_threshold_percent(0.1);
        let policy = CompactionPolicy::new(100_000, true, config);
        assert_eq!(policy.evaluate(49_999), PolicyDecision::BelowMinimum);
        assert_eq!(policy.evaluate(50_000), PolicyDecision::Triggered);
    }

    #[test]
    fn test_scenario_small_conversation() {
        assert!(!should_compact(50_000, "gpt-5.2", &config()));
        assert!(should_compact(300_000, "gpt-5.2", &config()));
    }

    #[test]
    fn test_full_threshold() {
        let policy = CompactionPolicy::new(200_000, true, config().with_threshold_percent(1.0));
        assert!(!policy.should_compact(199_999));
        assert!(policy.should_compact(200_000));
    }

    #[test]
    fn test_usage_ratio() {
        let policy = CompactionPolicy::new(100_000, true, config());
        assert!((policy.usage_ratio(50_000) - 0.5).abs() < 0.01);
        assert!((policy.usage_ratio(100_000) - 1.0).abs() < 0.01);

        let empty = CompactionPolicy::new(0, true, config());
        assert_eq!(empty.usage_ratio(10), 1.0);
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(PolicyDecision::Triggered.to_string(), "compaction triggered");
        assert_eq!(
            PolicyDecision::UnsupportedModel.to_string(),
            "model does not support compaction"
        );
    }
}
