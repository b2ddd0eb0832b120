//! Repository port for task and subtask persistence.
//!
//! Every method is a single transaction. Subtask-set mutations travel as a
//! [`SubTaskChange`] together with the recomputed parent row so that the
//! mutation and the rollup commit together or not at all.

use crate::failure::{Classify, FailureKind};
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use crate::task::domain::{SubTask, SubTaskId, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// One mutation of a task's subtask set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubTaskChange {
    /// A subtask was added.
    Added(SubTask),
    /// A subtask's completion flag changed.
    StatusChanged(SubTask),
    /// A subtask was removed.
    Removed(SubTaskId),
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::TaskNotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task and deletes all of its
    /// subtasks in the same transaction (reassignment invalidates the
    /// in-progress breakdown).
    ///
    /// Returns how many subtasks were deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::TaskNotFound`] when the task does not
    /// exist.
    async fn update_resetting_subtasks(&self, task: &Task) -> TaskRepositoryResult<u64>;

    /// Deletes a task and all of its subtasks, subtasks first, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::TaskNotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Returns every task in the project ordered by creation time.
    async fn tasks_for(&self, project: ProjectId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the project's tasks whose assignee is `user` or nobody,
    /// ordered by deadline ascending with missing deadlines last.
    async fn executable_tasks(
        &self,
        project: ProjectId,
        user: UserId,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Clears the hidden flag on every task in the project.
    ///
    /// Returns how many tasks were unhidden.
    async fn unhide_all(&self, project: ProjectId) -> TaskRepositoryResult<u64>;

    /// Finds a subtask by identifier.
    ///
    /// Returns `None` when the subtask does not exist.
    async fn find_subtask(&self, id: SubTaskId) -> TaskRepositoryResult<Option<SubTask>>;

    /// Returns a task's subtasks in insertion order.
    async fn subtasks_for(&self, task: TaskId) -> TaskRepositoryResult<Vec<SubTask>>;

    /// Applies one subtask mutation together with the recomputed parent
    /// row, committing both or neither.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::TaskNotFound`] when the parent does
    /// not exist, or [`TaskRepositoryError::SubTaskNotFound`] when an
    /// updated or removed subtask does not exist.
    async fn commit_subtask_change(
        &self,
        change: &SubTaskChange,
        parent: &Task,
    ) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The subtask was not found.
    #[error("subtask not found: {0}")]
    SubTaskNotFound(SubTaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Classify for TaskRepositoryError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::TaskNotFound(_) | Self::SubTaskNotFound(_) => FailureKind::NotFound,
            Self::Persistence(_) => FailureKind::Internal,
        }
    }
}
