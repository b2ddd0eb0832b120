//! In-memory project repository over the shared database.

use crate::identity::domain::UserId;
use crate::project::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::storage::MemoryDb;
use async_trait::async_trait;

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone)]
pub struct InMemoryProjectRepository {
    db: MemoryDb,
}

impl InMemoryProjectRepository {
    /// Creates a repository over the shared in-memory database.
    #[must_use]
    pub const fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.db.write().map_err(ProjectRepositoryError::persistence)?;
        state.projects.push(project.clone());
        Ok(())
    }

    async fn find(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.db.read().map_err(ProjectRepositoryError::persistence)?;
        Ok(state.projects.iter().find(|row| row.id() == id).cloned())
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.db.write().map_err(ProjectRepositoryError::persistence)?;
        let row = state
            .projects
            .iter_mut()
            .find(|row| row.id() == project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        *row = project.clone();
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        let mut state = self.db.write().map_err(ProjectRepositoryError::persistence)?;
        if !state.projects.iter().any(|row| row.id() == id) {
            return Err(ProjectRepositoryError::NotFound(id));
        }
        state.delete_project_cascade(id);
        Ok(())
    }

    async fn created_by(&self, user: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.db.read().map_err(ProjectRepositoryError::persistence)?;
        let mut projects: Vec<Project> = state
            .projects
            .iter()
            .filter(|row| row.creator_id() == user)
            .cloned()
            .collect();
        projects.sort_by_key(|project| std::cmp::Reverse(project.created_at()));
        Ok(projects)
    }

    async fn with_assignments_for(
        &self,
        user: UserId,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.db.read().map_err(ProjectRepositoryError::persistence)?;
        let mut projects: Vec<Project> = state
            .projects
            .iter()
            .filter(|project| {
                state.tasks.iter().any(|task| {
                    task.project_id() == project.id() && task.assignee_id() == Some(user)
                })
            })
            .cloned()
            .collect();
        projects.sort_by_key(|project| std::cmp::Reverse(project.created_at()));
        Ok(projects)
    }
}
