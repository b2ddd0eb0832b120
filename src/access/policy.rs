//! Pure capability checks shared by every engine operation.

use crate::failure::{Classify, FailureKind};
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use thiserror::Error;

/// Errors returned when an actor lacks the role an operation requires.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The actor is not the creator of the project.
    #[error("user {actor} is not the creator of project {project}")]
    NotCreator {
        /// Acting user.
        actor: UserId,
        /// Project whose management was attempted.
        project: ProjectId,
    },

    /// The actor is not the owner of the record being acted on.
    #[error("user {actor} may not act on a record owned by user {owner}")]
    NotSelf {
        /// Acting user.
        actor: UserId,
        /// Owner of the record.
        owner: UserId,
    },

    /// The actor is not a participant of the project.
    #[error("user {actor} is not a participant of project {project}")]
    NotParticipant {
        /// Acting user.
        actor: UserId,
        /// Project the operation targeted.
        project: ProjectId,
    },
}

impl Classify for AccessError {
    fn kind(&self) -> FailureKind {
        FailureKind::Forbidden
    }
}

/// Requires that `actor` is the creator of `project`.
///
/// # Errors
///
/// Returns [`AccessError::NotCreator`] otherwise.
pub fn require_creator(
    creator: UserId,
    actor: UserId,
    project: ProjectId,
) -> Result<(), AccessError> {
    if creator == actor {
        Ok(())
    } else {
        Err(AccessError::NotCreator { actor, project })
    }
}

/// Requires that `actor` owns the record held by `owner`.
///
/// Covers the self-service operations: cancelling one's own application and
/// answering one's own invitation.
///
/// # Errors
///
/// Returns [`AccessError::NotSelf`] otherwise.
pub fn require_self(owner: UserId, actor: UserId) -> Result<(), AccessError> {
    if owner == actor {
        Ok(())
    } else {
        Err(AccessError::NotSelf { actor, owner })
    }
}

/// Requires that `actor` is a participant of `project`.
///
/// The membership fact is fetched by the caller; this function only renders
/// the decision so that the policy stays independently testable.
///
/// # Errors
///
/// Returns [`AccessError::NotParticipant`] when `is_member` is false.
pub fn require_participant(
    is_member: bool,
    actor: UserId,
    project: ProjectId,
) -> Result<(), AccessError> {
    if is_member {
        Ok(())
    } else {
        Err(AccessError::NotParticipant { actor, project })
    }
}
