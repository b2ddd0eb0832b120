//! Application aggregate: an applicant-initiated membership request.

use super::{ApplicationId, MembershipDomainError, MembershipStatus};
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Membership request submitted by a prospective participant.
///
/// A user may accumulate several historical applications to one project,
/// but at most one of them may be open (pending or accepted) at a time;
/// [`Application::is_open`] backs that check against the latest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    id: ApplicationId,
    user_id: UserId,
    project_id: ProjectId,
    status: MembershipStatus,
    applied_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedApplicationData {
    /// Persisted application identifier.
    pub id: ApplicationId,
    /// Persisted applicant identifier.
    pub user_id: UserId,
    /// Persisted project identifier.
    pub project_id: ProjectId,
    /// Persisted request status.
    pub status: MembershipStatus,
    /// Persisted submission timestamp.
    pub applied_at: DateTime<Utc>,
}

impl Application {
    /// Creates a new pending application.
    #[must_use]
    pub fn new(user_id: UserId, project_id: ProjectId, clock: &impl Clock) -> Self {
        Self {
            id: ApplicationId::new(),
            user_id,
            project_id,
            status: MembershipStatus::Pending,
            applied_at: clock.utc(),
        }
    }

    /// Reconstructs an application from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedApplicationData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            project_id: data.project_id,
            status: data.status,
            applied_at: data.applied_at,
        }
    }

    /// Returns the application identifier.
    #[must_use]
    pub const fn id(&self) -> ApplicationId {
        self.id
    }

    /// Returns the applicant's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the request status.
    #[must_use]
    pub const fn status(&self) -> MembershipStatus {
        self.status
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub const fn applied_at(&self) -> DateTime<Utc> {
        self.applied_at
    }

    /// Returns true while the request blocks a re-application: pending and
    /// accepted applications are open, rejected ones are not.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.status, MembershipStatus::Rejected)
    }

    /// Marks the application accepted.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipDomainError::AlreadyResolved`] unless the
    /// application is pending.
    pub fn accept(&mut self) -> Result<(), MembershipDomainError> {
        self.transition(MembershipStatus::Accepted)
    }

    /// Marks the application rejected. The applicant may re-apply afterward
    /// with a fresh record.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipDomainError::AlreadyResolved`] unless the
    /// application is pending.
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
