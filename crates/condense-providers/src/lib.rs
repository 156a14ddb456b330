//! Condense Providers - Remote compaction
//!
//! This crate talks to the responses-style compaction endpoint:
//! - Converting chat-style history into responses input items
//! - Issuing the compaction request
//! - Falling back to the uncompacted conversation on any failure

mod client;
mod config;
mod error;
mod response_handling;
mod responses;
mod traits;

pub use client::CompactionClient;
pub use config::{CompactionClientConfig, DEFAULT_BASE_URL};
pub use error::ProviderError;
pub use response_handling::{parse_error_body, summarize_error_body};
pub use responses::{
    build_compact_request, convert_item, convert_to_responses_input, CompactRequest,
    CompactResponse, CompactUsage, ResponsesInputItem, ResponsesRole,
};
pub use secrecy::SecretString;
pub use traits::{CompactionResult, ContextCompactor};
