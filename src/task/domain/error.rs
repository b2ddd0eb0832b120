//! Error types for task domain validation and parsing.

use super::TaskId;
use crate::failure::{Classify, FailureKind};
use crate::project::domain::Deadline;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming or exceeds 100 characters.
    #[error("invalid task title '{0}', expected 1-100 characters")]
    InvalidTitle(String),

    /// The subtask title is empty after trimming or exceeds 128 characters.
    #[error("invalid subtask title '{0}', expected 1-128 characters")]
    InvalidSubTaskTitle(String),

    /// The subtask deadline falls after the parent task's deadline.
    #[error("subtask deadline {subtask} exceeds the task deadline {task}")]
    DeadlineBeyondParent {
        /// Deadline requested for the subtask.
        subtask: Deadline,
        /// Deadline of the parent task.
        task: Deadline,
    },

    /// The task already has an assignee; self-assignment is
    /// first-come-first-served.
    #[error("task {0} already has an assignee")]
    AlreadyAssigned(TaskId),

    /// The task cannot complete while subtasks remain open.
    #[error("task {task} has {remaining} incomplete subtasks")]
    IncompleteSubTasks {
        /// Task whose completion was attempted.
        task: TaskId,
        /// Number of subtasks still open.
        remaining: usize,
    },
}

impl Classify for TaskDomainError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidTitle(_)
            | Self::InvalidSubTaskTitle(_)
            | Self::DeadlineBeyondParent { .. } => FailureKind::Validation,
            Self::AlreadyAssigned(_) | Self::IncompleteSubTasks { .. } => FailureKind::Conflict,
        }
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
