//! Task aggregate root.

use super::{SubTask, TaskDomainError, TaskId, TaskStatus};
use crate::identity::domain::UserId;
use crate::project::domain::{Deadline, ProjectId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_TASK_TITLE_LENGTH: usize = 100;

/// Validated task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTitle`] when the value is empty
    /// after trimming or exceeds 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().count() > MAX_TASK_TITLE_LENGTH {
            return Err(TaskDomainError::InvalidTitle(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task aggregate root.
///
/// The legacy schema stored a `completed` boolean alongside the status and
/// required every mutator to keep the two in sync. Here the flag is derived
/// from [`TaskStatus::Completed`], so the invariant holds by construction;
/// persistence still writes both columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: String,
    status: TaskStatus,
    deadline: Option<Deadline>,
    created_at: DateTime<Utc>,
    project_id: ProjectId,
    assignee_id: Option<UserId>,
    hidden: bool,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted execution status.
    pub status: TaskStatus,
    /// Persisted deadline, if any.
    pub deadline: Option<Deadline>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted owning project identifier.
    pub project_id: ProjectId,
    /// Persisted assignee, if any.
    pub assignee_id: Option<UserId>,
    /// Persisted hidden flag.
    pub hidden: bool,
}

impl Task {
    /// Creates a new unstarted, visible task in the given project.
    #[must_use]
    pub fn new(
        title: TaskTitle,
        description: impl Into<String>,
        project_id: ProjectId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: TaskId::new(),
            title,
            description: description.into(),
            status: TaskStatus::NotStarted,
            deadline: None,
            created_at: clock.utc(),
            project_id,
            assignee_id: None,
            hidden: false,
        }
    }

    /// Sets the task deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee_id = Some(assignee);
        self
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            deadline: data.deadline,
            created_at: data.created_at,
            project_id: data.project_id,
            assignee_id: data.assignee_id,
            hidden: data.hidden,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the execution status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the completion flag derived from the status.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Returns the task deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the hidden flag.
    #[must_use]
    pub const fn hidden(&self) -> bool {
        self.hidden
    }

    /// Replaces the task title.
    pub fn set_title(&mut self, title: TaskTitle) {
        self.title = title;
    }

    /// Replaces the task description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replaces the task deadline.
    pub const fn set_deadline(&mut self, deadline: Option<Deadline>) {
        self.deadline = deadline;
    }

    /// Replaces the assignee; `None` unassigns.
    pub const fn set_assignee(&mut self, assignee: Option<UserId>) {
        self.assignee_id = assignee;
    }

    /// Claims the task for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyAssigned`] when the task already
    /// has an assignee; self-assignment is first-come-first-served.
    pub const fn claim(&mut self, user: UserId) -> Result<(), TaskDomainError> {
        if self.assignee_id.is_some() {
            return Err(TaskDomainError::AlreadyAssigned(self.id));
        }
        self.assignee_id = Some(user);
        Ok(())
    }

    /// Hides the task from the execution view. The flag is per-task, so
    /// hiding is visible to every participant.
    pub const fn hide(&mut self) {
        self.hidden = true;
    }

    /// Clears the hidden flag.
    pub const fn unhide(&mut self) {
        self.hidden = false;
    }

    /// Directly toggles completion.
    ///
    /// Completing is guarded by the subtask set: while any subtask is open
    /// the task cannot complete. Un-completing always succeeds and returns
    /// the task to `NotStarted`; `InProgress` is reachable only through
    /// [`Task::apply_rollup`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IncompleteSubTasks`] when completion is
    /// requested and any of `subtasks` is open. The task is unchanged.
    pub fn set_completion(
        &mut self,
        completed: bool,
        subtasks: &[SubTask],
    ) -> Result<(), TaskDomainError> {
        if completed {
            let remaining = subtasks.iter().filter(|subtask| !subtask.completed()).count();
            if remaining > 0 {
                return Err(TaskDomainError::IncompleteSubTasks {
                    task: self.id,
                    remaining,
                });
            }
        }

        self.status = if completed {
            TaskStatus::Completed
        } else {
            TaskStatus::NotStarted
        };
        Ok(())
    }

    /// Recomputes the status from the subtask set.
    ///
    /// An empty set leaves the status untouched; completing a subtask-free
    /// task is the caller's explicit decision via [`Task::set_completion`].
    pub fn apply_rollup(&mut self, subtasks: &[SubTask]) {
        let completed_count = subtasks.iter().filter(|subtask| subtask.completed()).count();
        if let Some(status) = TaskStatus::rollup(completed_count, subtasks.len()) {
            self.status = status;
        }
    }
}
