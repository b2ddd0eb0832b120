//! Service layer for the two membership request flows and the participant
//! set.
//!
//! Applications are applicant-initiated, invitations creator-initiated;
//! both converge on a participant record inserted atomically with the
//! request's status change. Participant uniqueness is enforced by the
//! storage layer, so accepting a request for a user who already joined
//! surfaces a conflict and rolls the status change back.

use crate::access::{AccessError, require_creator, require_self};
use crate::failure::{Classify, FailureKind};
use crate::identity::domain::{IdentityDomainError, UserId, Username};
use crate::identity::ports::{UserDirectory, UserDirectoryError};
use crate::membership::{
    domain::{
        Application, ApplicationId, Invitation, InvitationId, MembershipDomainError, Participant,
    },
    ports::{
        MembershipRepository, MembershipRepositoryError, ParticipantRemoval,
    },
};
use crate::project::domain::ProjectId;
use crate::project::ports::{ProjectRepository, ProjectRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Outcome of an application submission.
///
/// Submitting against an open application is idempotent: the caller learns
/// which record already represents them and no duplicate row is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new pending application was inserted.
    Submitted(Application),
    /// The latest application is still open; nothing was inserted.
    AlreadyOpen(Application),
}

impl ApplyOutcome {
    /// Returns the application the caller is now represented by.
    #[must_use]
    pub const fn application(&self) -> &Application {
        match self {
            Self::Submitted(application) | Self::AlreadyOpen(application) => application,
        }
    }
}

/// Result of accepting an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedApplication {
    /// The application, now accepted.
    pub application: Application,
    /// The participant record created alongside.
    pub participant: Participant,
}

/// Result of accepting an invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedInvitation {
    /// The invitation, now accepted.
    pub invitation: Invitation,
    /// The participant record created alongside.
    pub participant: Participant,
}

/// Service-level errors for membership operations.
#[derive(Debug, Error)]
pub enum MembershipServiceError {
    /// A membership request was already resolved.
    #[error(transparent)]
    Domain(#[from] MembershipDomainError),

    /// The submitted username failed validation.
    #[error(transparent)]
    Identity(#[from] IdentityDomainError),

    /// The actor lacks the required role.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The application does not exist.
    #[error("application not found: {0}")]
    ApplicationNotFound(ApplicationId),

    /// The invitation does not exist.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),

    /// No user holds the submitted username.
    #[error("no user named '{0}'")]
    UnknownUsername(String),

    /// Project creators do not apply to their own project.
    #[error("user {actor} created project {project} and cannot apply to it")]
    CreatorApplication {
        /// Acting user.
        actor: UserId,
        /// Project applied to.
        project: ProjectId,
    },

    /// The invited user already participates in the project.
    #[error("user {user} is already a participant of project {project}")]
    AlreadyParticipant {
        /// Invited user.
        user: UserId,
        /// Target project.
        project: ProjectId,
    },

    /// The invited user already holds a pending invitation.
    #[error("user {user} is already invited to project {project}")]
    AlreadyInvited {
        /// Invited user.
        user: UserId,
        /// Target project.
        project: ProjectId,
    },

    /// Membership persistence failed.
    #[error(transparent)]
    Repository(#[from] MembershipRepositoryError),

    /// Project persistence failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),

    /// User directory lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

impl Classify for MembershipServiceError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Identity(_) => FailureKind::Validation,
            Self::Access(_) | Self::CreatorApplication { .. } => FailureKind::Forbidden,
            Self::ProjectNotFound(_)
            | Self::ApplicationNotFound(_)
            | Self::InvitationNotFound(_)
            | Self::UnknownUsername(_) => FailureKind::NotFound,
            Self::AlreadyParticipant { .. } | Self::AlreadyInvited { .. } => {
                FailureKind::Conflict
            }
            Self::Repository(err) => err.kind(),
            Self::Projects(err) => err.kind(),
            Self::Directory(err) => err.kind(),
        }
    }
}

/// Result type for membership service operations.
pub type MembershipServiceResult<T> = Result<T, MembershipServiceError>;

/// Membership recruitment orchestration service.
#[derive(Clone)]
pub struct MembershipService<P, M, U, C>
where
    P: ProjectRepository,
    M: MembershipRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    memberships: Arc<M>,
    directory: Arc<U>,
    clock: Arc<C>,
}

impl<P, M, U, C> MembershipService<P, M, U, C>
where
    P: ProjectRepository,
    M: MembershipRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new membership service.
    #[must_use]
    pub const fn new(
        projects: Arc<P>,
        memberships: Arc<M>,
        directory: Arc<U>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            projects,
            memberships,
            directory,
            clock,
        }
    }

    /// Submits an application from `actor` to the project.
    ///
    /// The check runs against the actor's most recent application: while
    /// that record is pending or accepted the call is an idempotent no-op
    /// returning [`ApplyOutcome::AlreadyOpen`]. A rejected (or absent)
    /// latest record admits a fresh pending application.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::ProjectNotFound`] for an unknown
    /// project or [`MembershipServiceError::CreatorApplication`] when the
    /// actor owns the project.
    pub async fn apply(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> MembershipServiceResult<ApplyOutcome> {
        let project = self.project_or_error(project_id).await?;
        if project.creator_id() == actor {
            return Err(MembershipServiceError::CreatorApplication {
                actor,
                project: project_id,
            });
        }

        if let Some(latest) = self.memberships.latest_application(actor, project_id).await? {
            if latest.is_open() {
                tracing::debug!(
                    user = %actor,
                    project = %project_id,
                    application = %latest.id(),
                    "application already open, nothing submitted"
                );
                return Ok(ApplyOutcome::AlreadyOpen(latest));
            }
        }

        let application = Application::new(actor, project_id, &*self.clock);
        self.memberships.insert_application(&application).await?;
        tracing::info!(
            user = %actor,
            project = %project_id,
            application = %application.id(),
            "application submitted"
        );
        Ok(ApplyOutcome::Submitted(application))
    }

    /// Accepts an application and inserts the applicant as a participant,
    /// atomically. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Repository`] wrapping a duplicate
    /// participant when the applicant already joined; the status change
    /// rolls back with the transaction.
    pub async fn accept_application(
        &self,
        actor: UserId,
        application_id: ApplicationId,
    ) -> MembershipServiceResult<AcceptedApplication> {
        let mut application = self.application_or_error(application_id).await?;
        let project = self.project_or_error(application.project_id()).await?;
        require_creator(project.creator_id(), actor, project.id())?;

        application.accept()?;
        let participant =
            Participant::new(application.user_id(), application.project_id(), &*self.clock);
        self.memberships
            .commit_application_acceptance(&application, &participant)
            .await?;

        tracing::info!(
            user = %application.user_id(),
            project = %project.id(),
            application = %application_id,
            "application accepted"
        );
        Ok(AcceptedApplication {
            application,
            participant,
        })
    }

    /// Rejects an application. Creator only. The applicant may re-apply
    /// afterward with a fresh record.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Domain`] when the application was
    /// already resolved.
    pub async fn reject_application(
        &self,
        actor: UserId,
        application_id: ApplicationId,
    ) -> MembershipServiceResult<Application> {
        let mut application = self.application_or_error(application_id).await?;
        let project = self.project_or_error(application.project_id()).await?;
        require_creator(project.creator_id(), actor, project.id())?;

        application.reject()?;
        self.memberships.update_application(&application).await?;

        tracing::info!(
            user = %application.user_id(),
            project = %project.id(),
            application = %application_id,
            "application rejected"
        );
        Ok(application)
    }

    /// Withdraws the actor's own application, hard-deleting the record.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Access`] when the actor is not the
    /// applicant.
    pub async fn cancel_application(
        &self,
        actor: UserId,
        application_id: ApplicationId,
    ) -> MembershipServiceResult<()> {
        let application = self.application_or_error(application_id).await?;
        require_self(application.user_id(), actor)?;

        self.memberships.delete_application(application_id).await?;
        tracing::debug!(
            user = %actor,
            application = %application_id,
            "application withdrawn"
        );
        Ok(())
    }

    /// Extends an invitation to the named user. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::UnknownUsername`] when no user
    /// holds the username, [`MembershipServiceError::AlreadyParticipant`]
    /// when the target already joined, or
    /// [`MembershipServiceError::AlreadyInvited`] when a pending invitation
    /// already exists.
    pub async fn invite(
        &self,
        actor: UserId,
        project_id: ProjectId,
        username: &str,
    ) -> MembershipServiceResult<Invitation> {
        let project = self.project_or_error(project_id).await?;
        require_creator(project.creator_id(), actor, project_id)?;

        let name = Username::new(username)?;
        let user = self
            .directory
            .find_by_username(&name)
            .await?
            .ok_or_else(|| MembershipServiceError::UnknownUsername(username.to_owned()))?;

        if self.memberships.is_participant(project_id, user.id()).await? {
            return Err(MembershipServiceError::AlreadyParticipant {
                user: user.id(),
                project: project_id,
            });
        }
        if self
            .memberships
            .pending_invitation_exists(project_id, user.id())
            .await?
        {
            return Err(MembershipServiceError::AlreadyInvited {
                user: user.id(),
                project: project_id,
            });
        }

        let invitation = Invitation::new(user.id(), project_id, &*self.clock);
        self.memberships.insert_invitation(&invitation).await?;
        tracing::info!(
            user = %user.id(),
            project = %project_id,
            invitation = %invitation.id(),
            "invitation extended"
        );
        Ok(invitation)
    }

    /// Accepts an invitation and inserts the invitee as a participant,
    /// atomically. Invitee only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Repository`] wrapping a duplicate
    /// participant when the invitee already joined; the status change rolls
    /// back with the transaction.
    pub async fn accept_invitation(
        &self,
        actor: UserId,
        invitation_id: InvitationId,
    ) -> MembershipServiceResult<AcceptedInvitation> {
        let mut invitation = self.invitation_or_error(invitation_id).await?;
        require_self(invitation.user_id(), actor)?;

        invitation.accept()?;
        let participant =
            Participant::new(invitation.user_id(), invitation.project_id(), &*self.clock);
        self.memberships
            .commit_invitation_acceptance(&invitation, &participant)
            .await?;

        tracing::info!(
            user = %actor,
            project = %invitation.project_id(),
            invitation = %invitation_id,
            "invitation accepted"
        );
        Ok(AcceptedInvitation {
            invitation,
            participant,
        })
    }

    /// Rejects an invitation. Invitee only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Domain`] when the invitation was
    /// already resolved.
    pub async fn reject_invitation(
        &self,
        actor: UserId,
        invitation_id: InvitationId,
    ) -> MembershipServiceResult<Invitation> {
        let mut invitation = self.invitation_or_error(invitation_id).await?;
        require_self(invitation.user_id(), actor)?;

        invitation.reject()?;
        self.memberships.update_invitation(&invitation).await?;

        tracing::info!(
            user = %actor,
            project = %invitation.project_id(),
            invitation = %invitation_id,
            "invitation rejected"
        );
        Ok(invitation)
    }

    /// Revokes an invitation regardless of its status, hard-deleting the
    /// record. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Access`] when the actor is not the
    /// project creator.
    pub async fn revoke_invitation(
        &self,
        actor: UserId,
        invitation_id: InvitationId,
    ) -> MembershipServiceResult<()> {
        let invitation = self.invitation_or_error(invitation_id).await?;
        let project = self.project_or_error(invitation.project_id()).await?;
        require_creator(project.creator_id(), actor, project.id())?;

        self.memberships.delete_invitation(invitation_id).await?;
        tracing::debug!(
            project = %project.id(),
            invitation = %invitation_id,
            "invitation revoked"
        );
        Ok(())
    }

    /// Removes a participant and resets every task in the project assigned
    /// to them back to unassigned, atomically. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Repository`] wrapping a missing
    /// participant when no active membership exists for the pair.
    pub async fn remove_participant(
        &self,
        actor: UserId,
        project_id: ProjectId,
        user_id: UserId,
    ) -> MembershipServiceResult<ParticipantRemoval> {
        let project = self.project_or_error(project_id).await?;
        require_creator(project.creator_id(), actor, project_id)?;

        let removal = self.memberships.remove_participant(project_id, user_id).await?;
        tracing::info!(
            user = %user_id,
            project = %project_id,
            unassigned_tasks = removal.unassigned_tasks,
            "participant removed"
        );
        Ok(removal)
    }

    /// Returns the project's participants ordered by join time.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn participants(
        &self,
        project_id: ProjectId,
    ) -> MembershipServiceResult<Vec<Participant>> {
        Ok(self.memberships.participants(project_id).await?)
    }

    /// Returns every application submitted by the user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn applications_by(
        &self,
        user: UserId,
    ) -> MembershipServiceResult<Vec<Application>> {
        Ok(self.memberships.applications_by(user).await?)
    }

    /// Returns every application targeting the project, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn applications_for(
        &self,
        project_id: ProjectId,
    ) -> MembershipServiceResult<Vec<Application>> {
        Ok(self.memberships.applications_for(project_id).await?)
    }

    /// Returns the user's pending invitations, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn pending_invitations_for(
        &self,
        user: UserId,
    ) -> MembershipServiceResult<Vec<Invitation>> {
        Ok(self.memberships.pending_invitations_for(user).await?)
    }

    /// Returns every invitation extended for the project, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn invitations_for(
        &self,
        project_id: ProjectId,
    ) -> MembershipServiceResult<Vec<Invitation>> {
        Ok(self.memberships.invitations_for(project_id).await?)
    }

    async fn project_or_error(
        &self,
        project_id: ProjectId,
    ) -> MembershipServiceResult<crate::project::domain::Project> {
        self.projects
            .find(project_id)
            .await?
            .ok_or(MembershipServiceError::ProjectNotFound(project_id))
    }

    async fn application_or_error(
        &self,
        application_id: ApplicationId,
    ) -> MembershipServiceResult<Application> {
        self.memberships
            .find_application(application_id)
            .await?
            .ok_or(MembershipServiceError::ApplicationNotFound(application_id))
    }

    async fn invitation_or_error(
        &self,
        invitation_id: InvitationId,
    ) -> MembershipServiceResult<Invitation> {
        self.memberships
            .find_invitation(invitation_id)
            .await?
            .ok_or(MembershipServiceError::InvitationNotFound(invitation_id))
    }
}
