//! Invitation aggregate: a creator-initiated membership offer.

use super::{InvitationId, MembershipDomainError, MembershipStatus};
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Membership offer extended by a project creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    id: InvitationId,
    user_id: UserId,
    project_id: ProjectId,
    status: MembershipStatus,
    invited_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInvitationData {
    /// Persisted invitation identifier.
    pub id: InvitationId,
    /// Persisted invitee identifier.
    pub user_id: UserId,
    /// Persisted project identifier.
    pub project_id: ProjectId,
    /// Persisted offer status.
    pub status: MembershipStatus,
    /// Persisted creation timestamp.
    pub invited_at: DateTime<Utc>,
}

impl Invitation {
    /// Creates a new pending invitation.
    #[must_use]
    pub fn new(user_id: UserId, project_id: ProjectId, clock: &impl Clock) -> Self {
        Self {
            id: InvitationId::new(),
            user_id,
            project_id,
            status: MembershipStatus::Pending,
            invited_at: clock.utc(),
        }
    }

    /// Reconstructs an invitation from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedInvitationData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            project_id: data.project_id,
            status: data.status,
            invited_at: data.invited_at,
        }
    }

    /// Returns the invitation identifier.
    #[must_use]
    pub const fn id(&self) -> InvitationId {
        self.id
    }

    /// Returns the invitee's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the offer status.
    #[must_use]
    pub const fn status(&self) -> MembershipStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn invited_at(&self) -> DateTime<Utc> {
        self.invited_at
    }

    /// Marks the invitation accepted.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipDomainError::AlreadyResolved`] unless the
    /// invitation is pending.
    pub fn accept(&mut self) -> Result<(), MembershipDomainError> {
        self.transition(MembershipStatus::Accepted)
    }

    /// Marks the invitation rejected.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipDomainError::AlreadyResolved`] unless the
    /// invitation is pending.
    pub fn reject(&mut self) -> Result<(), MembershipDomainError> {
        self.transition(MembershipStatus::Rejected)
    }

    fn transition(&mut self, to: MembershipStatus) -> Result<(), MembershipDomainError> {
        if !self.status.is_pending() {
            return Err(MembershipDomainError::AlreadyResolved {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
