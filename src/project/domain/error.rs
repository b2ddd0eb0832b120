//! Error types for project domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain project values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project title is empty after trimming or exceeds 100 characters.
    #[error("invalid project title '{0}', expected 1-100 characters")]
    InvalidTitle(String),

    /// The project description is empty after trimming.
    #[error("project description must not be empty")]
    EmptyDescription,
}

/// Error returned while parsing a deadline from its `%Y-%m-%d` form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid deadline '{0}', expected YYYY-MM-DD")]
pub struct ParseDeadlineError(pub String);
