//! Repository port for applications, invitations, and the participant set.
//!
//! Every method is a single transaction. The composite methods
//! ([`MembershipRepository::commit_application_acceptance`],
//! [`MembershipRepository::commit_invitation_acceptance`], and
//! [`MembershipRepository::remove_participant`]) exist because those
//! operations must mutate several tables together or not at all.

use crate::failure::{Classify, FailureKind};
use crate::identity::domain::UserId;
use crate::membership::domain::{
    Application, ApplicationId, Invitation, InvitationId, Participant,
};
use crate::project::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for membership repository operations.
pub type MembershipRepositoryResult<T> = Result<T, MembershipRepositoryError>;

/// Outcome of an atomic participant removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRemoval {
    /// The deleted participant record.
    pub participant: Participant,
    /// How many tasks in the project were reset to unassigned.
    pub unassigned_tasks: u64,
}

/// Membership persistence contract.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Stores a new application.
    async fn insert_application(
        &self,
        application: &Application,
    ) -> MembershipRepositoryResult<()>;

    /// Finds an application by identifier.
    ///
    /// Returns `None` when the application does not exist.
    async fn find_application(
        &self,
        id: ApplicationId,
    ) -> MembershipRepositoryResult<Option<Application>>;

    /// Returns the user's most recent application to the project, judged by
    /// submission timestamp.
    async fn latest_application(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Option<Application>>;

    /// Persists a status change to an existing application.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipRepositoryError::ApplicationNotFound`] when the
    /// application does not exist.
    async fn update_application(
        &self,
        application: &Application,
    ) -> MembershipRepositoryResult<()>;

    /// Hard-deletes an application (applicant withdrawal).
    ///
    /// # Errors
    ///
    /// Returns [`MembershipRepositoryError::ApplicationNotFound`] when the
    /// application does not exist.
    async fn delete_application(&self, id: ApplicationId) -> MembershipRepositoryResult<()>;

    /// Returns every application submitted by the user, newest first.
    async fn applications_by(&self, user: UserId) -> MembershipRepositoryResult<Vec<Application>>;

    /// Returns every application targeting the project, newest first.
    async fn applications_for(
        &self,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Vec<Application>>;

    /// Stores a new invitation.
    async fn insert_invitation(&self, invitation: &Invitation)
    -> MembershipRepositoryResult<()>;

    /// Finds an invitation by identifier.
    ///
    /// Returns `None` when the invitation does not exist.
    async fn find_invitation(
        &self,
        id: InvitationId,
    ) -> MembershipRepositoryResult<Option<Invitation>>;

    /// Persists a status change to an existing invitation.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipRepositoryError::InvitationNotFound`] when the
    /// invitation does not exist.
    async fn update_invitation(&self, invitation: &Invitation)
    -> MembershipRepositoryResult<()>;

    /// Hard-deletes an invitation (creator revocation), regardless of its
    /// current status.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipRepositoryError::InvitationNotFound`] when the
    /// invitation does not exist.
    async fn delete_invitation(&self, id: InvitationId) -> MembershipRepositoryResult<()>;

    /// Returns whether the user holds a pending invitation for the project.
    async fn pending_invitation_exists(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> MembershipRepositoryResult<bool>;

    /// Returns the user's pending invitations, newest first.
    async fn pending_invitations_for(
        &self,
        user: UserId,
    ) -> MembershipRepositoryResult<Vec<Invitation>>;

    /// Returns every invitation extended for the project, newest first.
    async fn invitations_for(
        &self,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Vec<Invitation>>;

    /// Stores a new participant record.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipRepositoryError::DuplicateParticipant`] when the
    /// (user, project) pair already holds an active membership.
    async fn insert_participant(
        &self,
        participant: &Participant,
    ) -> MembershipRepositoryResult<()>;

    /// Returns whether the user is an active participant of the project.
    async fn is_participant(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> MembershipRepositoryResult<bool>;

    /// Returns the project's participants ordered by join time.
    async fn participants(
        &self,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Vec<Participant>>;

    /// Persists an application acceptance: the status change and the new
    /// participant commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipRepositoryError::DuplicateParticipant`] when the
    /// applicant already holds a membership; the status change rolls back.
    async fn commit_application_acceptance(
        &self,
        application: &Application,
        participant: &Participant,
    ) -> MembershipRepositoryResult<()>;

    /// Persists an invitation acceptance: the status change and the new
    /// participant commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipRepositoryError::DuplicateParticipant`] when the
    /// invitee already holds a membership; the status change rolls back.
    async fn commit_invitation_acceptance(
        &self,
        invitation: &Invitation,
        participant: &Participant,
    ) -> MembershipRepositoryResult<()>;

    /// Deletes the participant record and resets every task in the project
    /// assigned to that user back to unassigned, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipRepositoryError::ParticipantNotFound`] when no
    /// active membership exists for the pair.
    async fn remove_participant(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> MembershipRepositoryResult<ParticipantRemoval>;
}

/// Errors returned by membership repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MembershipRepositoryError {
    /// The application was not found.
    #[error("application not found: {0}")]
    ApplicationNotFound(ApplicationId),

    /// The invitation was not found.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),

    /// No active membership exists for the (user, project) pair.
    #[error("user {user} is not a participant of project {project}")]
    ParticipantNotFound {
        /// Member whose record was sought.
        user: UserId,
        /// Project searched.
        project: ProjectId,
    },

    /// The (user, project) pair already holds an active membership.
    #[error("user {user} is already a participant of project {project}")]
    DuplicateParticipant {
        /// Member whose insert was rejected.
        user: UserId,
        /// Project involved.
        project: ProjectId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MembershipRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Classify for MembershipRepositoryError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::ApplicationNotFound(_)
            | Self::InvitationNotFound(_)
            | Self::ParticipantNotFound { .. } => FailureKind::NotFound,
            Self::DuplicateParticipant { .. } => FailureKind::Conflict,
            Self::Persistence(_) => FailureKind::Internal,
        }
    }
}
