//! Service layer for task management, execution, and subtask rollup.
//!
//! Management operations (create, edit, assign, delete, bulk unhide) are
//! creator-only; execution operations (self-assignment, hiding, completion
//! toggling, subtask breakdown) belong to the project's participants.
//! Completion flows bottom-up: every subtask-set mutation recomputes the
//! parent's status, and a task with open subtasks refuses to complete.

use crate::access::{AccessError, require_creator, require_participant};
use crate::failure::{Classify, FailureKind};
use crate::identity::domain::UserId;
use crate::membership::ports::{MembershipRepository, MembershipRepositoryError};
use crate::project::domain::{Deadline, ParseDeadlineError, Project, ProjectId};
use crate::project::ports::{ProjectRepository, ProjectRepositoryError};
use crate::task::{
    domain::{SubTask, SubTaskId, SubTaskTitle, Task, TaskDomainError, TaskId, TaskTitle},
    ports::{SubTaskChange, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    title: String,
    description: String,
    deadline: Option<String>,
    assignee: Option<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with required task fields.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: String::new(),
            deadline: None,
            assignee: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the task deadline in `YYYY-MM-DD` form. When omitted the task
    /// inherits the project's deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }
}

/// Request payload for editing a task.
///
/// Title and description always replace the current values; the deadline is
/// replaced only when submitted. The assignee is always replaced, so an
/// omitted assignee unassigns the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTaskRequest {
    task_id: TaskId,
    title: String,
    description: String,
    deadline: Option<String>,
    assignee: Option<UserId>,
}

impl EditTaskRequest {
    /// Creates a request with required task fields.
    #[must_use]
    pub fn new(task_id: TaskId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task_id,
            title: title.into(),
            description: description.into(),
            deadline: None,
            assignee: None,
        }
    }

    /// Sets a replacement deadline in `YYYY-MM-DD` form.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Sets the assignee to keep or hand the task to.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }
}

/// Result of a subtask mutation: the subtask and the recomputed parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTaskUpdate {
    /// The mutated subtask.
    pub subtask: SubTask,
    /// The parent task after rollup.
    pub task: Task,
}

/// Tasks a participant can work on, with the derived hidden marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableTasks {
    /// Tasks assigned to the user or unassigned, deadline ascending.
    pub tasks: Vec<Task>,
    /// Whether any returned task is hidden; drives the unhide prompt.
    pub any_hidden: bool,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a completion guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// A deadline string failed to parse.
    #[error(transparent)]
    InvalidDeadline(#[from] ParseDeadlineError),

    /// The actor lacks the required role.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The subtask does not exist.
    #[error("subtask not found: {0}")]
    SubTaskNotFound(SubTaskId),

    /// Task persistence failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Project persistence failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),

    /// Membership lookup failed.
    #[error(transparent)]
    Memberships(#[from] MembershipRepositoryError),
}

impl Classify for TaskLifecycleError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::InvalidDeadline(_) => FailureKind::Validation,
            Self::Access(_) => FailureKind::Forbidden,
            Self::ProjectNotFound(_) | Self::TaskNotFound(_) | Self::SubTaskNotFound(_) => {
                FailureKind::NotFound
            }
            Self::Repository(err) => err.kind(),
            Self::Projects(err) => err.kind(),
            Self::Memberships(err) => err.kind(),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<P, M, T, C>
where
    P: ProjectRepository,
    M: MembershipRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    memberships: Arc<M>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<P, M, T, C> TaskLifecycleService<P, M, T, C>
where
    P: ProjectRepository,
    M: MembershipRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        projects: Arc<P>,
        memberships: Arc<M>,
        tasks: Arc<T>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            projects,
            memberships,
            tasks,
            clock,
        }
    }

    /// Creates a task in the project. Creator only.
    ///
    /// A task submitted without a deadline inherits the project's deadline.
    /// The assignee is not required to be a participant, matching how the
    /// management view offers every known user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when validation fails, the actor is
    /// not the creator, or persistence rejects the insert.
    pub async fn create_task(
        &self,
        actor: UserId,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let project = self.project_or_error(request.project_id).await?;
        require_creator(project.creator_id(), actor, project.id())?;

        let title = TaskTitle::new(request.title)?;
        let deadline = match request.deadline {
            Some(raw) => Some(Deadline::parse(&raw)?),
            None => project.deadline(),
        };

        let mut task = Task::new(title, request.description, project.id(), &*self.clock);
        if let Some(parsed) = deadline {
            task = task.with_deadline(parsed);
        }
        if let Some(assignee) = request.assignee {
            task = task.with_assignee(assignee);
        }

        self.tasks.insert(&task).await?;
        tracing::info!(task = %task.id(), project = %project.id(), "task created");
        Ok(task)
    }

    /// Edits a task's fields. Creator only.
    ///
    /// Changing the assignee deletes every subtask in the same transaction:
    /// reassignment invalidates the in-progress breakdown. The task's
    /// status is untouched by the reset.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an empty title or
    /// [`TaskLifecycleError::InvalidDeadline`] for a bad date string; the
    /// task is unchanged in both cases.
    pub async fn edit_task(
        &self,
        actor: UserId,
        request: EditTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.task_or_error(request.task_id).await?;
        let project = self.project_or_error(task.project_id()).await?;
        require_creator(project.creator_id(), actor, project.id())?;

        // Validate everything before touching the aggregate.
        let title = TaskTitle::new(request.title)?;
        let deadline = match request.deadline {
            Some(raw) => Some(Deadline::parse(&raw)?),
            None => None,
        };

        let previous_assignee = task.assignee_id();
        task.set_title(title);
        task.set_description(request.description);
        if let Some(parsed) = deadline {
            task.set_deadline(Some(parsed));
        }
        task.set_assignee(request.assignee);

        if previous_assignee == request.assignee {
            self.tasks.update(&task).await?;
        } else {
            let dropped = self.tasks.update_resetting_subtasks(&task).await?;
            tracing::info!(
                task = %task.id(),
                dropped_subtasks = dropped,
                "task reassigned, subtask breakdown discarded"
            );
        }
        Ok(task)
    }

    /// Reassigns a task explicitly; `None` unassigns. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Access`] when the actor is not the
    /// project creator.
    pub async fn assign(
        &self,
        actor: UserId,
        task_id: TaskId,
        assignee: Option<UserId>,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.task_or_error(task_id).await?;
        let project = self.project_or_error(task.project_id()).await?;
        require_creator(project.creator_id(), actor, project.id())?;

        task.set_assignee(assignee);
        self.tasks.update(&task).await?;
        tracing::debug!(task = %task_id, assignee = ?assignee, "task assignee updated");
        Ok(task)
    }

    /// Claims an unassigned task for the acting participant.
    ///
    /// First come, first served: a task that already has an assignee is not
    /// renegotiated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] wrapping
    /// [`TaskDomainError::AlreadyAssigned`] when someone claimed the task
    /// first, or [`TaskLifecycleError::Access`] when the actor is not a
    /// participant.
    pub async fn assign_to_self(
        &self,
        actor: UserId,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.task_or_error(task_id).await?;
        self.require_membership(task.project_id(), actor).await?;

        task.claim(actor)?;
        self.tasks.update(&task).await?;
        tracing::info!(task = %task_id, user = %actor, "task self-assigned");
        Ok(task)
    }

    /// Deletes a task and its subtasks, subtasks first. Creator only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Access`] when the actor is not the
    /// project creator.
    pub async fn delete_task(&self, actor: UserId, task_id: TaskId) -> TaskLifecycleResult<()> {
        let task = self.task_or_error(task_id).await?;
        let project = self.project_or_error(task.project_id()).await?;
        require_creator(project.creator_id(), actor, project.id())?;

        self.tasks.delete(task_id).await?;
        tracing::info!(task = %task_id, project = %project.id(), "task deleted");
        Ok(())
    }

    /// Hides a task from the execution view. Participant only.
    ///
    /// The flag is per-task rather than per-user, so hiding is visible to
    /// every participant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Access`] when the actor is not a
    /// participant of the task's project.
    pub async fn hide_task(&self, actor: UserId, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.task_or_error(task_id).await?;
        self.require_membership(task.project_id(), actor).await?;

        task.hide();
        self.tasks.update(&task).await?;
        tracing::debug!(task = %task_id, user = %actor, "task hidden");
        Ok(task)
    }

    /// Clears the hidden flag on every task in the project. Creator only.
    ///
    /// Returns how many tasks were unhidden.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Access`] when the actor is not the
    /// project creator.
    pub async fn unhide_all(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> TaskLifecycleResult<u64> {
        let project = self.project_or_error(project_id).await?;
        require_creator(project.creator_id(), actor, project_id)?;

        let unhidden = self.tasks.unhide_all(project_id).await?;
        tracing::debug!(project = %project_id, unhidden, "hidden tasks restored");
        Ok(unhidden)
    }

    /// Toggles a task's completion. Any participant of the task's project
    /// may call this, not only the assignee.
    ///
    /// Completion is guarded by the subtask set: while any subtask is open
    /// the task refuses to complete and is left unchanged. Direct toggling
    /// never produces `InProgress`; that status only arises from rollup.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] wrapping
    /// [`TaskDomainError::IncompleteSubTasks`] when completion is blocked,
    /// or [`TaskLifecycleError::Access`] when the actor is not a
    /// participant.
    pub async fn update_task_status(
        &self,
        actor: UserId,
        task_id: TaskId,
        completed: bool,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.task_or_error(task_id).await?;
        self.require_membership(task.project_id(), actor).await?;

        let subtasks = self.tasks.subtasks_for(task_id).await?;
        task.set_completion(completed, &subtasks)?;
        self.tasks.update(&task).await?;

        tracing::info!(
            task = %task_id,
            user = %actor,
            status = task.status().as_str(),
            "task status updated"
        );
        Ok(task)
    }

    /// Adds a subtask under a task. Participant only.
    ///
    /// The subtask deadline must parse and must not fall after the parent
    /// task's deadline (date-only comparison). The parent's status is
    /// recomputed with the new subtask counted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidDeadline`] for a bad date
    /// string or [`TaskLifecycleError::Domain`] wrapping
    /// [`TaskDomainError::DeadlineBeyondParent`] for an overshooting one;
    /// no row is created in either case.
    pub async fn add_subtask(
        &self,
        actor: UserId,
        task_id: TaskId,
        title: &str,
        deadline: &str,
    ) -> TaskLifecycleResult<SubTaskUpdate> {
        let mut task = self.task_or_error(task_id).await?;
        self.require_membership(task.project_id(), actor).await?;

        let subtask_title = SubTaskTitle::new(title)?;
        let parsed = Deadline::parse(deadline)?;
        let subtask = SubTask::new(subtask_title, parsed, task_id, task.deadline())?;

        let mut siblings = self.tasks.subtasks_for(task_id).await?;
        siblings.push(subtask.clone());
        task.apply_rollup(&siblings);

        self.tasks
            .commit_subtask_change(&SubTaskChange::Added(subtask.clone()), &task)
            .await?;
        tracing::info!(task = %task_id, subtask = %subtask.id(), "subtask added");
        Ok(SubTaskUpdate { subtask, task })
    }

    /// Sets a subtask's completion flag and rolls the result up into the
    /// parent task: all siblings complete → `Completed`, some →
    /// `InProgress`, none → `NotStarted`. Both rows commit together.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::SubTaskNotFound`] for an unknown
    /// subtask.
    pub async fn update_subtask_status(
        &self,
        actor: UserId,
        subtask_id: SubTaskId,
        completed: bool,
    ) -> TaskLifecycleResult<SubTaskUpdate> {
        let mut subtask = self.subtask_or_error(subtask_id).await?;
        let mut task = self.task_or_error(subtask.task_id()).await?;

        subtask.set_completed(completed);
        let mut siblings = self.tasks.subtasks_for(task.id()).await?;
        for row in &mut siblings {
            if row.id() == subtask_id {
                row.set_completed(completed);
            }
        }
        task.apply_rollup(&siblings);

        self.tasks
            .commit_subtask_change(&SubTaskChange::StatusChanged(subtask.clone()), &task)
            .await?;
        tracing::info!(
            task = %task.id(),
            subtask = %subtask_id,
            user = %actor,
            status = task.status().as_str(),
            "subtask status rolled up"
        );
        Ok(SubTaskUpdate { subtask, task })
    }

    /// Hard-deletes a subtask and recomputes the parent from the remaining
    /// siblings. Deleting the last subtask leaves the parent's status
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::SubTaskNotFound`] for an unknown
    /// subtask.
    pub async fn delete_subtask(
        &self,
        actor: UserId,
        subtask_id: SubTaskId,
    ) -> TaskLifecycleResult<Task> {
        let subtask = self.subtask_or_error(subtask_id).await?;
        let mut task = self.task_or_error(subtask.task_id()).await?;

        let mut siblings = self.tasks.subtasks_for(task.id()).await?;
        siblings.retain(|row| row.id() != subtask_id);
        task.apply_rollup(&siblings);

        self.tasks
            .commit_subtask_change(&SubTaskChange::Removed(subtask_id), &task)
            .await?;
        tracing::debug!(
            task = %task.id(),
            subtask = %subtask_id,
            user = %actor,
            "subtask deleted"
        );
        Ok(task)
    }

    /// Returns the tasks a participant can work on in the project: those
    /// assigned to them or to nobody, deadline ascending, together with a
    /// flag marking whether any of them is hidden.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_executable(
        &self,
        project_id: ProjectId,
        user: UserId,
    ) -> TaskLifecycleResult<ExecutableTasks> {
        let tasks = self.tasks.executable_tasks(project_id, user).await?;
        let any_hidden = tasks.iter().any(Task::hidden);
        Ok(ExecutableTasks { tasks, any_hidden })
    }

    /// Returns every task in the project ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn tasks_for(&self, project_id: ProjectId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.tasks_for(project_id).await?)
    }

    /// Returns a task's subtasks in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn subtasks_for(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<SubTask>> {
        Ok(self.tasks.subtasks_for(task_id).await?)
    }

    async fn require_membership(
        &self,
        project_id: ProjectId,
        actor: UserId,
    ) -> TaskLifecycleResult<()> {
        let is_member = self.memberships.is_participant(project_id, actor).await?;
        require_participant(is_member, actor, project_id)?;
        Ok(())
    }

    async fn project_or_error(&self, project_id: ProjectId) -> TaskLifecycleResult<Project> {
        self.projects
            .find(project_id)
            .await?
            .ok_or(TaskLifecycleError::ProjectNotFound(project_id))
    }

    async fn task_or_error(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn subtask_or_error(&self, subtask_id: SubTaskId) -> TaskLifecycleResult<SubTask> {
        self.tasks
            .find_subtask(subtask_id)
            .await?
            .ok_or(TaskLifecycleError::SubTaskNotFound(subtask_id))
    }
}
