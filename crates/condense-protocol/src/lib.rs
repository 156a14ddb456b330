//! Condense Protocol - Conversation types
//!
//! This crate defines the message model the compaction pipeline reads:
//! - Role-tagged messages
//! - Text or structured content
//! - Typed content items with a passthrough for anything unrecognized

mod content;
mod messages;

pub use content::*;
pub use messages::*;
