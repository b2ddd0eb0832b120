//! `PostgreSQL` repository implementation for project storage.
//!
//! Cascading deletion runs as raw statements inside one transaction so the
//! project and every dependent row disappear together; the dependent tables
//! belong to other bounded contexts and are touched here only by these
//! statements.

use super::{
    models::{NewProjectRow, ProjectRow},
    schema::projects,
};
use crate::identity::domain::UserId;
use crate::project::{
    domain::{Deadline, PersistedProjectData, Project, ProjectId, ProjectTitle},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::storage::postgres::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

impl From<DieselError> for ProjectRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn insert(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let new_row = to_new_row(project);
        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn find(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let id = project.id();
        let title = project.title().as_str().to_owned();
        let description = project.description().to_owned();
        let skills = project.skills_required().map(str::to_owned);
        let deadline = project.deadline().map(Deadline::date);

        self.run_blocking(move |connection| {
            let updated = diesel::update(projects::table.filter(projects::id.eq(id.into_inner())))
                .set((
                    projects::title.eq(title),
                    projects::description.eq(description),
                    projects::skills_required.eq(skills),
                    projects::deadline.eq(deadline),
                ))
                .execute(connection)?;
            if updated == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<(), ProjectRepositoryError, _>(|txn| {
                let project_uuid = id.into_inner();

                diesel::sql_query(
                    "DELETE FROM subtasks WHERE task_id IN \
                     (SELECT id FROM tasks WHERE project_id = $1)",
                )
                .bind::<diesel::sql_types::Uuid, _>(project_uuid)
                .execute(txn)?;
                diesel::sql_query("DELETE FROM tasks WHERE project_id = $1")
                    .bind::<diesel::sql_types::Uuid, _>(project_uuid)
                    .execute(txn)?;
                diesel::sql_query("DELETE FROM project_participants WHERE project_id = $1")
                    .bind::<diesel::sql_types::Uuid, _>(project_uuid)
                    .execute(txn)?;
                diesel::sql_query("DELETE FROM applications WHERE project_id = $1")
                    .bind::<diesel::sql_types::Uuid, _>(project_uuid)
                    .execute(txn)?;
                diesel::sql_query("DELETE FROM invitations WHERE project_id = $1")
                    .bind::<diesel::sql_types::Uuid, _>(project_uuid)
                    .execute(txn)?;
                diesel::sql_query("DELETE FROM messages WHERE project_id = $1")
                    .bind::<diesel::sql_types::Uuid, _>(project_uuid)
                    .execute(txn)?;

                let deleted =
                    diesel::delete(projects::table.filter(projects::id.eq(project_uuid)))
                        .execute(txn)?;
                if deleted == 0 {
                    return Err(ProjectRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn created_by(&self, user: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .filter(projects::creator_id.eq(user.into_inner()))
                .order(projects::created_at.desc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn with_assignments_for(
        &self,
        user: UserId,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(concat!(
                "SELECT p.id, p.title, p.description, p.skills_required, p.deadline, ",
                "p.creator_id, p.created_at FROM projects p ",
                "WHERE EXISTS (SELECT 1 FROM tasks t ",
                "WHERE t.project_id = p.id AND t.assignee_id = $1) ",
                "ORDER BY p.created_at DESC",
            ))
            .bind::<diesel::sql_types::Uuid, _>(user.into_inner())
            .load::<ProjectRow>(connection)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }
}

fn to_new_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        title: project.title().as_str().to_owned(),
        description: project.description().to_owned(),
        skills_required: project.skills_required().map(str::to_owned),
        deadline: project.deadline().map(Deadline::date),
        creator_id: project.creator_id().into_inner(),
        created_at: project.created_at(),
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        title,
        description,
        skills_required,
        deadline,
        creator_id,
        created_at,
    } = row;

    let data = PersistedProjectData {
        id: ProjectId::from_uuid(id),
        title: ProjectTitle::new(title).map_err(ProjectRepositoryError::persistence)?,
        description,
        skills_required,
        deadline: deadline.map(Deadline::from_date),
        creator_id: UserId::from_uuid(creator_id),
        created_at,
    };
    Ok(Project::from_persisted(data))
}
