//! Service layer for project creation, deadline updates, and deletion.

use crate::access::{AccessError, require_creator};
use crate::failure::{Classify, FailureKind};
use crate::identity::domain::UserId;
use crate::membership::domain::Participant;
use crate::membership::ports::{MembershipRepository, MembershipRepositoryError};
use crate::project::{
    domain::{Deadline, ParseDeadlineError, Project, ProjectDomainError, ProjectId, ProjectTitle},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    title: String,
    description: String,
    skills_required: Option<String>,
    deadline: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with required project fields.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            skills_required: None,
            deadline: None,
        }
    }

    /// Sets the skills text shown to prospective applicants.
    #[must_use]
    pub fn with_skills_required(mut self, skills: impl Into<String>) -> Self {
        self.skills_required = Some(skills.into());
        self
    }

    /// Sets the project deadline in `YYYY-MM-DD` form.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}

/// Service-level errors for project lifecycle operations.
#[derive(Debug, Error)]
pub enum ProjectLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// A deadline string failed to parse.
    #[error(transparent)]
    InvalidDeadline(#[from] ParseDeadlineError),

    /// The actor lacks the required role.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Project persistence failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),

    /// Membership persistence failed while seeding the creator.
    #[error(transparent)]
    Membership(#[from] MembershipRepositoryError),
}

impl Classify for ProjectLifecycleError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_) | Self::InvalidDeadline(_) => FailureKind::Validation,
            Self::Access(_) => FailureKind::Forbidden,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Repository(err) => err.kind(),
            Self::Membership(err) => err.kind(),
        }
    }
}

/// Result type for project lifecycle service operations.
pub type ProjectLifecycleResult<T> = Result<T, ProjectLifecycleError>;

/// Project lifecycle orchestration service.
#[derive(Clone)]
pub struct ProjectLifecycleService<P, M, C>
where
    P: ProjectRepository,
    M: MembershipRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    memberships: Arc<M>,
    clock: Arc<C>,
}

impl<P, M, C> ProjectLifecycleService<P, M, C>
where
    P: ProjectRepository,
    M: MembershipRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project lifecycle service.
    #[must_use]
    pub const fn new(projects: Arc<P>, memberships: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            projects,
            memberships,
            clock,
        }
    }

    /// Creates a project owned by `actor` and seeds the creator as its
    /// first participant.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError`] when validation fails or
    /// persistence rejects either insert.
    pub async fn create(
        &self,
        actor: UserId,
        request: CreateProjectRequest,
    ) -> ProjectLifecycleResult<Project> {
        let title = ProjectTitle::new(request.title)?;
        let mut project = Project::new(title, request.description, actor, &*self.clock)?;
        if let Some(skills) = request.skills_required {
            project = project.with_skills_required(skills);
        }
        if let Some(raw) = request.deadline {
            project = project.with_deadline(Deadline::parse(&raw)?);
        }

        self.projects.insert(&project).await?;
        let seed = Participant::new(actor, project.id(), &*self.clock);
        self.memberships.insert_participant(&seed).await?;

        tracing::info!(project = %project.id(), creator = %actor, "project created");
        Ok(project)
    }

    /// Replaces the project deadline. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::NotFound`] for an unknown project,
    /// [`ProjectLifecycleError::Access`] for a non-creator actor, or
    /// [`ProjectLifecycleError::InvalidDeadline`] for a bad date string.
    pub async fn update_deadline(
        &self,
        actor: UserId,
        project_id: ProjectId,
        deadline: &str,
    ) -> ProjectLifecycleResult<Project> {
        let mut project = self.find_or_error(project_id).await?;
        require_creator(project.creator_id(), actor, project_id)?;

        let parsed = Deadline::parse(deadline)?;
        project.set_deadline(parsed);
        self.projects.update(&project).await?;

        tracing::debug!(project = %project_id, deadline = %parsed, "project deadline updated");
        Ok(project)
    }

    /// Deletes the project and every dependent row. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::NotFound`] for an unknown project or
    /// [`ProjectLifecycleError::Access`] for a non-creator actor.
    pub async fn delete(&self, actor: UserId, project_id: ProjectId) -> ProjectLifecycleResult<()> {
        let project = self.find_or_error(project_id).await?;
        require_creator(project.creator_id(), actor, project_id)?;

        self.projects.delete(project_id).await?;
        tracing::info!(project = %project_id, "project deleted with all dependents");
        Ok(())
    }

    /// Retrieves a project by identifier.
    ///
    /// Returns `Ok(None)` when the project does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn find(&self, project_id: ProjectId) -> ProjectLifecycleResult<Option<Project>> {
        Ok(self.projects.find(project_id).await?)
    }

    /// Returns the projects created by the user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn created_by(&self, user: UserId) -> ProjectLifecycleResult<Vec<Project>> {
        Ok(self.projects.created_by(user).await?)
    }

    /// Returns the projects in which the user currently has at least one
    /// assigned task; drives the personal overview alongside
    /// [`ProjectLifecycleService::created_by`].
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn with_assignments_for(
        &self,
        user: UserId,
    ) -> ProjectLifecycleResult<Vec<Project>> {
        Ok(self.projects.with_assignments_for(user).await?)
    }

    async fn find_or_error(&self, project_id: ProjectId) -> ProjectLifecycleResult<Project> {
        self.projects
            .find(project_id)
            .await?
            .ok_or(ProjectLifecycleError::NotFound(project_id))
    }
}
