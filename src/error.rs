//! Error handling for DeepSight Core

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
///
/// There is deliberately no `NotFound` variant: mutation operations on the
/// alert log treat unknown ids as no-ops (UI-tolerant policy), so a missing
/// id is not an error condition anywhere in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed raw detection or rejected upload
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
