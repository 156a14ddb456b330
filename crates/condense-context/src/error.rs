//! Context error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("invalid compaction threshold: {0} (must be greater than 0 and at most 1)")]
    InvalidThreshold(f64),
}
