//! Model policy table
//!
//! Model names are matched case-insensitively by substring. Both tables are
//! ordered and the first matching entry wins, so more specific names must
//! come before the families that contain them.

use serde::Serialize;

/// Context window assumed for models missing from the table
pub const DEFAULT_CONTEXT_WINDOW: usize = 128_000;

const CONTEXT_WINDOWS: &[(&str, usize)] = &[
    ("gpt-5.2", 400_000),
    ("gpt-5.1", 400_000),
    ("gpt-5-codex", 400_000),
    ("gpt-5-mini", 400_000),
    ("gpt-5-nano", 400_000),
    ("gpt-5", 400_000),
    ("gpt-4.1", 1_047_576),
    ("codex-mini", 200_000),
    ("o4-mini", 200_000),
    ("o3", 200_000),
    ("gpt-4o", 128_000),
];

/// Models the remote compaction endpoint accepts
const COMPACTION_MODELS: &[&str] = &["gpt-5", "gpt-4.1", "codex-mini", "o4-mini", "o3"];

pub fn context_window(model: &str) -> usize {
    let model = model.to_lowercase();
    CONTEXT_WINDOWS
        .iter()
        .find(|(key, _)| model.contains(key))
        .map(|(_, window)| *window)
        .unwrap_or(DEFAULT_CONTEXT_WINDOW)
}

pub fn supports_compaction(model: &str) -> bool {
    let model = model.to_lowercase();
    COMPACTION_MODELS.iter().any(|key| model.contains(key))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub context_window: usize,
    pub supports_compaction: bool,
}

pub fn model_info(model: &str) -> ModelInfo {
    ModelInfo {
        context_window: context_window(model),
        supports_compaction: supports_compaction(model),
    }
}
