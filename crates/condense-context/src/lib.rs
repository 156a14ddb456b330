//! Condense Context - Context window budgeting
//!
//! This crate decides whether a conversation is due for compaction:
//! - Token estimation over text, structured items and arbitrary JSON
//! - Per-model context window and compaction support lookup
//! - Threshold policy combining both with the configured limits

mod config;
mod error;
mod estimator;
mod models;
mod policy;

pub use config::CompactionConfig;
pub use error::ContextError;
pub use estimator::{
    estimate_content_tokens, estimate_entries_tokens, estimate_item_tokens,
    estimate_message_tokens, estimate_messages_tokens, estimate_text_tokens,
    estimate_value_tokens, is_image_like, CHARS_PER_TOKEN, IMAGE_TOKEN_ESTIMATE,
};
pub use models::{
    context_window, model_info, supports_compaction, ModelInfo, DEFAULT_CONTEXT_WINDOW,
};
pub use policy::{should_compact, CompactionPolicy, PolicyDecision};
