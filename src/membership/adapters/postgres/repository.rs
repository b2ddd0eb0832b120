//! `PostgreSQL` repository implementation for membership storage.
//!
//! The composite operations run inside explicit transactions. Participant
//! uniqueness rests on the `idx_participants_project_user_unique` index;
//! a violation aborts the enclosing transaction, rolling back whatever
//! status change accompanied the insert.

use super::{
    models::{
        ApplicationRow, InvitationRow, NewApplicationRow, NewInvitationRow, NewParticipantRow,
        ParticipantRow,
    },
    schema::{applications, invitations, project_participants},
};
use crate::identity::domain::UserId;
use crate::membership::{
    domain::{
        Application, ApplicationId, Invitation, InvitationId, MembershipStatus, Participant,
        ParticipantId, PersistedApplicationData, PersistedInvitationData,
        PersistedParticipantData,
    },
    ports::{
        MembershipRepository, MembershipRepositoryError, MembershipRepositoryResult,
        ParticipantRemoval,
    },
};
use crate::project::domain::ProjectId;
use crate::storage::postgres::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl From<DieselError> for MembershipRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed membership repository.
#[derive(Debug, Clone)]
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> MembershipRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MembershipRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(MembershipRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(MembershipRepositoryError::persistence)?
    }
}

/// Inserts a participant row, mapping the unique-index violation onto the
/// typed duplicate error.
fn insert_participant_row(
    connection: &mut PgConnection,
    participant: &Participant,
) -> MembershipRepositoryResult<()> {
    let new_row = participant_to_new_row(participant);
    diesel::insert_into(project_participants::table)
        .values(&new_row)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                MembershipRepositoryError::DuplicateParticipant {
                    user: participant.user_id(),
                    project: participant.project_id(),
                }
            }
            _ => MembershipRepositoryError::persistence(err),
        })?;
    Ok(())
}

fn update_application_row(
    connection: &mut PgConnection,
    application: &Application,
) -> MembershipRepositoryResult<()> {
    let updated = diesel::update(
        applications::table.filter(applications::id.eq(application.id().into_inner())),
    )
    .set(applications::status.eq(application.status().as_str()))
    .execute(connection)?;
    if updated == 0 {
        return Err(MembershipRepositoryError::ApplicationNotFound(
            application.id(),
        ));
    }
    Ok(())
}

fn update_invitation_row(
    connection: &mut PgConnection,
    invitation: &Invitation,
) -> MembershipRepositoryResult<()> {
    let updated = diesel::update(
        invitations::table.filter(invitations::id.eq(invitation.id().into_inner())),
    )
    .set(invitations::status.eq(invitation.status().as_str()))
    .execute(connection)?;
    if updated == 0 {
        return Err(MembershipRepositoryError::InvitationNotFound(
            invitation.id(),
        ));
    }
    Ok(())
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn insert_application(
        &self,
        application: &Application,
    ) -> MembershipRepositoryResult<()> {
        let new_row = application_to_new_row(application);
        self.run_blocking(move |connection| {
            diesel::insert_into(applications::table)
                .values(&new_row)
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn find_application(
        &self,
        id: ApplicationId,
    ) -> MembershipRepositoryResult<Option<Application>> {
        self.run_blocking(move |connection| {
            let row = applications::table
                .filter(applications::id.eq(id.into_inner()))
                .select(ApplicationRow::as_select())
                .first::<ApplicationRow>(connection)
                .optional()?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn latest_application(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Option<Application>> {
        self.run_blocking(move |connection| {
            let row = applications::table
                .filter(applications::user_id.eq(user.into_inner()))
                .filter(applications::project_id.eq(project.into_inner()))
                .order(applications::applied_at.desc())
                .select(ApplicationRow::as_select())
                .first::<ApplicationRow>(connection)
                .optional()?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn update_application(
        &self,
        application: &Application,
    ) -> MembershipRepositoryResult<()> {
        let application = application.clone();
        self.run_blocking(move |connection| update_application_row(connection, &application))
            .await
    }

    async fn delete_application(&self, id: ApplicationId) -> MembershipRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                applications::table.filter(applications::id.eq(id.into_inner())),
            )
            .execute(connection)?;
            if deleted == 0 {
                return Err(MembershipRepositoryError::ApplicationNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn applications_by(
        &self,
        user: UserId,
    ) -> MembershipRepositoryResult<Vec<Application>> {
        self.run_blocking(move |connection| {
            let rows = applications::table
                .filter(applications::user_id.eq(user.into_inner()))
                .order(applications::applied_at.desc())
                .select(ApplicationRow::as_select())
                .load::<ApplicationRow>(connection)?;
            rows.into_iter().map(row_to_application).collect()
        })
        .await
    }

    async fn applications_for(
        &self,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Vec<Application>> {
        self.run_blocking(move |connection| {
            let rows = applications::table
                .filter(applications::project_id.eq(project.into_inner()))
                .order(applications::applied_at.desc())
                .select(ApplicationRow::as_select())
                .load::<ApplicationRow>(connection)?;
            rows.into_iter().map(row_to_application).collect()
        })
        .await
    }

    async fn insert_invitation(
        &self,
        invitation: &Invitation,
    ) -> MembershipRepositoryResult<()> {
        let new_row = invitation_to_new_row(invitation);
        self.run_blocking(move |connection| {
            diesel::insert_into(invitations::table)
                .values(&new_row)
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn find_invitation(
        &self,
        id: InvitationId,
    ) -> MembershipRepositoryResult<Option<Invitation>> {
        self.run_blocking(move |connection| {
            let row = invitations::table
                .filter(invitations::id.eq(id.into_inner()))
                .select(InvitationRow::as_select())
                .first::<InvitationRow>(connection)
                .optional()?;
            row.map(row_to_invitation).transpose()
        })
        .await
    }

    async fn update_invitation(
        &self,
        invitation: &Invitation,
    ) -> MembershipRepositoryResult<()> {
        let invitation = invitation.clone();
        self.run_blocking(move |connection| update_invitation_row(connection, &invitation))
            .await
    }

    async fn delete_invitation(&self, id: InvitationId) -> MembershipRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                invitations::table.filter(invitations::id.eq(id.into_inner())),
            )
            .execute(connection)?;
            if deleted == 0 {
                return Err(MembershipRepositoryError::InvitationNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn pending_invitation_exists(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> MembershipRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let row = invitations::table
                .filter(invitations::project_id.eq(project.into_inner()))
                .filter(invitations::user_id.eq(user.into_inner()))
                .filter(invitations::status.eq(MembershipStatus::Pending.as_str()))
                .select(InvitationRow::as_select())
                .first::<InvitationRow>(connection)
                .optional()?;
            Ok(row.is_some())
        })
        .await
    }

    async fn pending_invitations_for(
        &self,
        user: UserId,
    ) -> MembershipRepositoryResult<Vec<Invitation>> {
        self.run_blocking(move |connection| {
            let rows = invitations::table
                .filter(invitations::user_id.eq(user.into_inner()))
                .filter(invitations::status.eq(MembershipStatus::Pending.as_str()))
                .order(invitations::invited_at.desc())
                .select(InvitationRow::as_select())
                .load::<InvitationRow>(connection)?;
            rows.into_iter().map(row_to_invitation).collect()
        })
        .await
    }

    async fn invitations_for(
        &self,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Vec<Invitation>> {
        self.run_blocking(move |connection| {
            let rows = invitations::table
                .filter(invitations::project_id.eq(project.into_inner()))
                .order(invitations::invited_at.desc())
                .select(InvitationRow::as_select())
                .load::<InvitationRow>(connection)?;
            rows.into_iter().map(row_to_invitation).collect()
        })
        .await
    }

    async fn insert_participant(
        &self,
        participant: &Participant,
    ) -> MembershipRepositoryResult<()> {
        let participant = participant.clone();
        self.run_blocking(move |connection| insert_participant_row(connection, &participant))
            .await
    }

    async fn is_participant(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> MembershipRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let row = project_participants::table
                .filter(project_participants::project_id.eq(project.into_inner()))
                .filter(project_participants::user_id.eq(user.into_inner()))
                .select(ParticipantRow::as_select())
                .first::<ParticipantRow>(connection)
                .optional()?;
            Ok(row.is_some())
        })
        .await
    }

    async fn participants(
        &self,
        project: ProjectId,
    ) -> MembershipRepositoryResult<Vec<Participant>> {
        self.run_blocking(move |connection| {
            let rows = project_participants::table
                .filter(project_participants::project_id.eq(project.into_inner()))
                .order(project_participants::joined_at.asc())
                .select(ParticipantRow::as_select())
                .load::<ParticipantRow>(connection)?;
            Ok(rows.into_iter().map(row_to_participant).collect())
        })
        .await
    }

    async fn commit_application_acceptance(
        &self,
        application: &Application,
        participant: &Participant,
    ) -> MembershipRepositoryResult<()> {
        let application = application.clone();
        let participant = participant.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<(), MembershipRepositoryError, _>(|txn| {
                update_application_row(txn, &application)?;
                insert_participant_row(txn, &participant)
            })
        })
        .await
    }

    async fn commit_invitation_acceptance(
        &self,
        invitation: &Invitation,
        participant: &Participant,
    ) -> MembershipRepositoryResult<()> {
        let invitation = invitation.clone();
        let participant = participant.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<(), MembershipRepositoryError, _>(|txn| {
                update_invitation_row(txn, &invitation)?;
                insert_participant_row(txn, &participant)
            })
        })
        .await
    }

    async fn remove_participant(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> MembershipRepositoryResult<ParticipantRemoval> {
        self.run_blocking(move |connection| {
            connection.transaction::<ParticipantRemoval, MembershipRepositoryError, _>(|txn| {
                let row = project_participants::table
                    .filter(project_participants::project_id.eq(project.into_inner()))
                    .filter(project_participants::user_id.eq(user.into_inner()))
                    .select(ParticipantRow::as_select())
                    .first::<ParticipantRow>(txn)
                    .optional()?
                    .ok_or(MembershipRepositoryError::ParticipantNotFound { user, project })?;

                let unassigned = diesel::sql_query(
                    "UPDATE tasks SET assignee_id = NULL \
                     WHERE project_id = $1 AND assignee_id = $2",
                )
                .bind::<diesel::sql_types::Uuid, _>(project.into_inner())
                .bind::<diesel::sql_types::Uuid, _>(user.into_inner())
                .execute(txn)?;

                diesel::delete(
                    project_participants::table.filter(project_participants::id.eq(row.id)),
                )
                .execute(txn)?;

                Ok(ParticipantRemoval {
                    participant: row_to_participant(row),
                    unassigned_tasks: u64::try_from(unassigned)
                        .map_err(MembershipRepositoryError::persistence)?,
                })
            })
        })
        .await
    }
}

fn application_to_new_row(application: &Application) -> NewApplicationRow {
    NewApplicationRow {
        id: application.id().into_inner(),
        user_id: application.user_id().into_inner(),
        project_id: application.project_id().into_inner(),
        status: application.status().as_str().to_owned(),
        applied_at: application.applied_at(),
    }
}

fn invitation_to_new_row(invitation: &Invitation) -> NewInvitationRow {
    NewInvitationRow {
        id: invitation.id().into_inner(),
        user_id: invitation.user_id().into_inner(),
        project_id: invitation.project_id().into_inner(),
        status: invitation.status().as_str().to_owned(),
        invited_at: invitation.invited_at(),
    }
}

fn participant_to_new_row(participant: &Participant) -> NewParticipantRow {
    NewParticipantRow {
        id: participant.id().into_inner(),
        user_id: participant.user_id().into_inner(),
        project_id: participant.project_id().into_inner(),
        joined_at: participant.joined_at(),
    }
}

fn row_to_application(row: ApplicationRow) -> MembershipRepositoryResult<Application> {
    let ApplicationRow {
        id,
        user_id,
        project_id,
        status,
        applied_at,
    } = row;

    let data = PersistedApplicationData {
        id: ApplicationId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        project_id: ProjectId::from_uuid(project_id),
        status: MembershipStatus::try_from(status.as_str())
            .map_err(MembershipRepositoryError::persistence)?,
        applied_at,
    };
    Ok(Application::from_persisted(data))
}

fn row_to_invitation(row: InvitationRow) -> MembershipRepositoryResult<Invitation> {
    let InvitationRow {
        id,
        user_id,
        project_id,
        status,
        invited_at,
    } = row;

    let data = PersistedInvitationData {
        id: InvitationId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        project_id: ProjectId::from_uuid(project_id),
        status: MembershipStatus::try_from(status.as_str())
            .map_err(MembershipRepositoryError::persistence)?,
        invited_at,
    };
    Ok(Invitation::from_persisted(data))
}

fn row_to_participant(row: ParticipantRow) -> Participant {
    let ParticipantRow {
        id,
        user_id,
        project_id,
        joined_at,
    } = row;

    Participant::from_persisted(PersistedParticipantData {
        id: ParticipantId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        project_id: ProjectId::from_uuid(project_id),
        joined_at,
    })
}
