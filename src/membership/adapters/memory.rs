//! In-memory membership repository over the shared database.

use crate::identity::domain::UserId;
use crate::membership::{
    domain::{
        Application, ApplicationId, Invitation, InvitationId, Participant,
    },
    ports::{
        MembershipRepository, MembershipRepositoryError, MembershipRepositoryResult,
        ParticipantRemoval,
    },
};
use crate::project::domain::ProjectId;
use crate::storage::MemoryDb;
use crate::storage::memory::DbState;
use async_trait::async_trait;
use std::cmp::Reverse;

/// Thread-safe in-memory membership repository.
///
/// Composite operations take the shared write guard once, so the
/// participant insert, the request status change, and the task
/// unassignment commit together exactly as the Postgres adapter's
/// transactions do.
#[derive(Debug, Clone)]
pub struct InMemoryMembershipRepository {
    db: MemoryDb,
}

impl InMemoryMembershipRepository {
    /// Creates a repository over the shared in-memory database.
    #[must_use]
    pub const fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

/// Inserts a participant after re-checking uniqueness under the held lock.
fn insert_participant_row(
    state: &mut DbState,
    participant: &Participant,
) -> MembershipRepositoryResult<()> {
    let duplicate = state.participants.iter().any(|row| {
        row.user_id() == participant.user_id() && row.project_id() == participant.project_id()
    });
    if duplicate {
        return Err(MembershipRepositoryError::DuplicateParticipant {
            user: participant.user_id(),
            project: participant.project_id(),
        });
    }
    state.participants.push(participant.clone());
    Ok(())
}

fn replace_application_row(
    state: &mut DbState,
    application: &Application,
) -> MembershipRepositoryResult<()> {
    let row = state
        .applications
        .iter_mut()
        .find(|row| row.id() == application.id())
        .ok_or(MembershipRepositoryError::ApplicationNotFound(
            application.id(),
        ))?;
    *row = application.clone();
    Ok(())
}

fn replace_invitation_row(
    state: &mut DbState,
    invitation: &Invitation,
) -> MembershipRepositoryResult<()> {
    let row = state
        .invitations
        .iter_mut()
        .find(|row| row.id() == invitation.id())
        .ok_or(MembershipRepositoryError::InvitationNotFound(
            invitation.id(),
        ))?;
    *row = invitation.clone();
    Ok(())
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn insert_application(
        &self,
        application: &Application,
    ) -> MembershipRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        state.applications.push(application.clone());
        Ok(())
    }

    async fn find_application(
        &self,
        id: ApplicationId,
    ) -> MembershipRepositoryResult<Option<Application>> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        Ok(state.applications.iter().find(|row| row.id() == id).cloned())
    }

    async fn latest_application(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Option<Application>> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        // Later insertions win timestamp ties, matching the storage scan
        // order of the relational adapter.
        let mut latest: Option<&Application> = None;
        for row in &state.applications {
            if row.user_id() == user && row.project_id() == project {
                let newer = latest.is_none_or(|best| row.applied_at() >= best.applied_at());
                if newer {
                    latest = Some(row);
                }
            }
        }
        Ok(latest.cloned())
    }

    async fn update_application(
        &self,
        application: &Application,
    ) -> MembershipRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        replace_application_row(&mut state, application)
    }

    async fn delete_application(&self, id: ApplicationId) -> MembershipRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        let position = state
            .applications
            .iter()
            .position(|row| row.id() == id)
            .ok_or(MembershipRepositoryError::ApplicationNotFound(id))?;
        state.applications.remove(position);
        Ok(())
    }

    async fn applications_by(
        &self,
        user: UserId,
    ) -> MembershipRepositoryResult<Vec<Application>> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        let mut applications: Vec<Application> = state
            .applications
            .iter()
            .filter(|row| row.user_id() == user)
            .cloned()
            .collect();
        applications.sort_by_key(|row| Reverse(row.applied_at()));
        Ok(applications)
    }

    async fn applications_for(
        &self,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Vec<Application>> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        let mut applications: Vec<Application> = state
            .applications
            .iter()
            .filter(|row| row.project_id() == project)
            .cloned()
            .collect();
        applications.sort_by_key(|row| Reverse(row.applied_at()));
        Ok(applications)
    }

    async fn insert_invitation(
        &self,
        invitation: &Invitation,
    ) -> MembershipRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        state.invitations.push(invitation.clone());
        Ok(())
    }

    async fn find_invitation(
        &self,
        id: InvitationId,
    ) -> MembershipRepositoryResult<Option<Invitation>> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        Ok(state.invitations.iter().find(|row| row.id() == id).cloned())
    }

    async fn update_invitation(
        &self,
        invitation: &Invitation,
    ) -> MembershipRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        replace_invitation_row(&mut state, invitation)
    }

    async fn delete_invitation(&self, id: InvitationId) -> MembershipRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        let position = state
            .invitations
            .iter()
            .position(|row| row.id() == id)
            .ok_or(MembershipRepositoryError::InvitationNotFound(id))?;
        state.invitations.remove(position);
        Ok(())
    }

    async fn pending_invitation_exists(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> MembershipRepositoryResult<bool> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        Ok(state.invitations.iter().any(|row| {
            row.project_id() == project && row.user_id() == user && row.status().is_pending()
        }))
    }

    async fn pending_invitations_for(
        &self,
        user: UserId,
    ) -> MembershipRepositoryResult<Vec<Invitation>> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        let mut invitations: Vec<Invitation> = state
            .invitations
            .iter()
            .filter(|row| row.user_id() == user && row.status().is_pending())
            .cloned()
            .collect();
        invitations.sort_by_key(|row| Reverse(row.invited_at()));
        Ok(invitations)
    }

    async fn invitations_for(
        &self,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Vec<Invitation>> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        let mut invitations: Vec<Invitation> = state
            .invitations
            .iter()
            .filter(|row| row.project_id() == project)
            .cloned()
            .collect();
        invitations.sort_by_key(|row| Reverse(row.invited_at()));
        Ok(invitations)
    }

    async fn insert_participant(
        &self,
        participant: &Participant,
    ) -> MembershipRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        insert_participant_row(&mut state, participant)
    }

    async fn is_participant(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> MembershipRepositoryResult<bool> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        Ok(state
            .participants
            .iter()
            .any(|row| row.project_id() == project && row.user_id() == user))
    }

    async fn participants(
        &self,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Vec<Participant>> {
        let state = self
            .db
            .read()
            .map_err(MembershipRepositoryError::persistence)?;
        let mut participants: Vec<Participant> = state
            .participants
            .iter()
            .filter(|row| row.project_id() == project)
            .cloned()
            .collect();
        participants.sort_by_key(Participant::joined_at);
        Ok(participants)
    }

    async fn commit_application_acceptance(
        &self,
        application: &Application,
        participant: &Participant,
    ) -> MembershipRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        // Both checks run before either row changes so a failure leaves
        // the state untouched.
        if !state
            .applications
            .iter()
            .any(|row| row.id() == application.id())
        {
            return Err(MembershipRepositoryError::ApplicationNotFound(
                application.id(),
            ));
        }
        insert_participant_row(&mut state, participant)?;
        replace_application_row(&mut state, application)
    }

    async fn commit_invitation_acceptance(
        &self,
        invitation: &Invitation,
        participant: &Participant,
    ) -> MembershipRepositoryResult<()> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        if !state
            .invitations
            .iter()
            .any(|row| row.id() == invitation.id())
        {
            return Err(MembershipRepositoryError::InvitationNotFound(
                invitation.id(),
            ));
        }
        insert_participant_row(&mut state, participant)?;
        replace_invitation_row(&mut state, invitation)
    }

    async fn remove_participant(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> MembershipRepositoryResult<ParticipantRemoval> {
        let mut state = self
            .db
            .write()
            .map_err(MembershipRepositoryError::persistence)?;
        let position = state
            .participants
            .iter()
            .position(|row| row.project_id() == project && row.user_id() == user)
            .ok_or(MembershipRepositoryError::ParticipantNotFound { user, project })?;
        let participant = state.participants.remove(position);
        let unassigned_tasks = state.unassign_project_tasks(project, user);
        Ok(ParticipantRemoval {
            participant,
            unassigned_tasks,
        })
    }
}
