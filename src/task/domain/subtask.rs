//! Subtask entity owned by a task.

use super::{SubTaskId, TaskDomainError, TaskId};
use crate::project::domain::Deadline;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_SUBTASK_TITLE_LENGTH: usize = 128;

/// Validated subtask title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubTaskTitle(String);

impl SubTaskTitle {
    /// Creates a validated subtask title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidSubTaskTitle`] when the value is
    /// empty after trimming or exceeds 128 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().count() > MAX_SUBTASK_TITLE_LENGTH {
            return Err(TaskDomainError::InvalidSubTaskTitle(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SubTaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SubTaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit of work under a task.
///
/// A subtask deadline may not fall after the parent task's deadline. The
/// ordering is validated at creation only; a later change to the parent's
/// deadline does not re-validate existing subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    id: SubTaskId,
    title: SubTaskTitle,
    deadline: Deadline,
    completed: bool,
    task_id: TaskId,
}

/// Parameter object for reconstructing a persisted subtask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSubTaskData {
    /// Persisted subtask identifier.
    pub id: SubTaskId,
    /// Persisted title.
    pub title: SubTaskTitle,
    /// Persisted deadline.
    pub deadline: Deadline,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted owning task identifier.
    pub task_id: TaskId,
}

impl SubTask {
    /// Creates a new incomplete subtask under the given task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DeadlineBeyondParent`] when the subtask
    /// deadline falls after `parent_deadline` (date-only comparison). A
    /// parent without a deadline accepts any subtask deadline.
    pub fn new(
        title: SubTaskTitle,
        deadline: Deadline,
        task_id: TaskId,
        parent_deadline: Option<Deadline>,
    ) -> Result<Self, TaskDomainError> {
        if let Some(parent) = parent_deadline {
            if deadline.date() > parent.date() {
                return Err(TaskDomainError::DeadlineBeyondParent {
                    subtask: deadline,
                    task: parent,
                });
            }
        }

        Ok(Self {
            id: SubTaskId::new(),
            title,
            deadline,
            completed: false,
            task_id,
        })
    }

    /// Reconstructs a subtask from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSubTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            deadline: data.deadline,
            completed: data.completed,
            task_id: data.task_id,
        }
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> SubTaskId {
        self.id
    }

    /// Returns the subtask title.
    #[must_use]
    pub const fn title(&self) -> &SubTaskTitle {
        &self.title
    }

    /// Returns the subtask deadline.
    #[must_use]
    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Returns the completion flag.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Sets the completion flag.
    pub const fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}
