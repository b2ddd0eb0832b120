//! Failure classification shared by every service error.
//!
//! The routing layer consuming this crate maps each failed operation onto a
//! user-facing outcome. Rather than matching on every service error enum, it
//! asks the error for its [`FailureKind`] and renders accordingly.

/// Coarse classification of a failed engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A referenced entity does not exist.
    NotFound,
    /// The actor lacks the role the operation requires.
    Forbidden,
    /// The operation would violate an invariant of the current state.
    Conflict,
    /// The input was malformed or failed a validation rule.
    Validation,
    /// Persistence or another internal collaborator failed.
    Internal,
}

/// Errors that can report the coarse class of failure they represent.
pub trait Classify {
    /// Returns the failure class for this error.
    fn kind(&self) -> FailureKind;
}
