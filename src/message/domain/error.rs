//! Error types for message domain validation.

use thiserror::Error;

/// Errors returned while constructing domain message values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageDomainError {
    /// The message content is empty after trimming.
    #[error("message content must not be empty")]
    EmptyContent,
}
