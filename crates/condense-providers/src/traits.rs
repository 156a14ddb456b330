//! Compactor trait and result type

use async_trait::async_trait;
use condense_protocol::Message;
use serde::Serialize;
use serde_json::Value;

/// Outcome of one compaction attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CompactionResult {
    /// Proceed with the original history
    NotCompacted { original_tokens: usize },
    /// Send `compacted_input` onward in place of the original history
    Compacted {
        compacted_input: Vec<Value>,
        original_tokens: usize,
        compacted_tokens: usize,
    },
}

impl CompactionResult {
    pub fn is_compacted(&self) -> bool {
        matches!(self, Self::Compacted { .. })
    }

    pub fn original_tokens(&self) -> usize {
        match self {
            Self::NotCompacted { original_tokens } | Self::Compacted { original_tokens, .. } => {
                *original_tokens
            }
        }
    }

    pub fn compacted_tokens(&self) -> Option<usize> {
        match self {
            Self::NotCompacted { .. } => None,
            Self::Compacted {
                compacted_tokens, ..
            } => Some(*compacted_tokens),
        }
    }

    pub fn compacted_input(&self) -> Option<&[Value]> {
        match self {
            Self::NotCompacted { .. } => None,
            Self::Compacted {
                compacted_input, ..
            } => Some(compacted_input),
        }
    }
}

/// Something that can shrink a conversation before the next request
#[async_trait]
pub trait ContextCompactor: Send + Sync {
    /// Never fails: any problem yields [`CompactionResult::NotCompacted`]
    async fn compact(&self, messages: &[Message], instructions: Option<&str>)
        -> CompactionResult;

    /// Get the model identifier
    fn model(&self) -> &str;

    /// Get the provider name
    fn provider(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let skipped = CompactionResult::NotCompacted {
            original_tokens: 50_000,
        };
        assert!(!skipped.is_compacted());
        assert_eq!(skipped.original_tokens(), 50_000);
        assert_eq!(skipped.compacted_tokens(), None);
        assert!(skipped.compacted_input().is_none());

        let done = CompactionResult::Compacted {
            compacted_input: vec![json!({"type": "compaction"})],
            original_tokens: 300_000,
            compacted_tokens: 90_000,
        };
        assert!(done.is_compacted());
        assert_eq!(done.original_tokens(), 300_000);
        assert_eq!(done.compacted_tokens(), Some(90_000));
        assert_eq!(done.compacted_input().map(|i| i.len()), Some(1));
    }

    #[test]
    fn test_serialization() {
        let skipped = CompactionResult::NotCompacted {
            original_tokens: 12,
        };
        assert_eq!(
            serde_json::to_value(skipped).unwrap(),
            json!({"outcome": "not_compacted", "original_tokens": 12})
        );
    }
}
